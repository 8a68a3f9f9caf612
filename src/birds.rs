//! Bird trajectory generation.
//!
//! Every round gets a fresh [`BirdSet`]: each bird enters from one horizontal
//! edge, follows a quadratic Bézier arc bent around the viewport center and
//! leaves through the opposite edge. Birds are generated independently; the
//! level's occlusion density is not used for placement.

use rand::Rng;

use crate::levels::{BIRD_COLORS, LevelConfig};

/// Horizontal distance beyond the viewport edge where birds start and end.
pub const EDGE_MARGIN: f64 = 50.0;
/// Maximum control point offset from the viewport center on each axis.
pub const CONTROL_JITTER: f64 = 200.0;

/// Drawing area the birds are laid out against (CSS pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One bird's flight for a single round.
#[derive(Clone, Debug, PartialEq)]
pub struct Bird {
    pub id: u32, // unique within its set
    pub start: Point,
    pub control: Point,
    pub end: Point,
    pub start_time: f64, // seconds after the presentation starts
    pub duration: f64,   // seconds to traverse the curve
    pub size: f64,
    pub color: &'static str,
    pub wing_flap_speed: f64,
}

/// Birds for one round plus the ground truth count scoring reads.
#[derive(Clone, Debug, Default)]
pub struct BirdSet {
    pub birds: Vec<Bird>,
    pub actual_count: u32,
}

/// Sample a bird count from the level's range and build that many flights.
pub fn generate<R: Rng>(level: &LevelConfig, viewport: Viewport, rng: &mut R) -> BirdSet {
    let (min, max) = level.bird_count_range;
    let actual_count = rng.gen_range(min..=max.max(min));
    let birds = (0..actual_count)
        .map(|id| generate_bird(id, level, viewport, rng))
        .collect();
    BirdSet {
        birds,
        actual_count,
    }
}

fn generate_bird<R: Rng>(
    id: u32,
    level: &LevelConfig,
    viewport: Viewport,
    rng: &mut R,
) -> Bird {
    let Viewport { width, height } = viewport;
    let from_left = rng.gen_bool(0.5);
    let (start_x, end_x) = if from_left {
        (-EDGE_MARGIN, width + EDGE_MARGIN)
    } else {
        (width + EDGE_MARGIN, -EDGE_MARGIN)
    };
    let start_y = unit(rng) * height;
    let end_y = unit(rng) * height;
    let control = Point::new(
        width / 2.0 + (unit(rng) - 0.5) * 2.0 * CONTROL_JITTER,
        height / 2.0 + (unit(rng) - 0.5) * 2.0 * CONTROL_JITTER,
    );

    Bird {
        id,
        start: Point::new(start_x, start_y),
        control,
        end: Point::new(end_x, end_y),
        start_time: unit(rng) * level.stagger_window(),
        duration: 10.0 / level.speed_range.0 + unit(rng) * 0.5,
        size: 15.0 + unit(rng) * 15.0,
        color: BIRD_COLORS[rng.gen_range(0..BIRD_COLORS.len())],
        wing_flap_speed: 15.0 + unit(rng) * 10.0,
    }
}

/// Uniform sample in `[0, 1)`.
fn unit<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LEVELS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn count_stays_within_level_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for level in &LEVELS {
            for _ in 0..200 {
                let set = generate(level, Viewport::default(), &mut rng);
                let (min, max) = level.bird_count_range;
                assert!(set.actual_count >= min && set.actual_count <= max);
                assert_eq!(set.birds.len(), set.actual_count as usize);
            }
        }
    }

    #[test]
    fn birds_cross_from_edge_to_opposite_edge() {
        let mut rng = StdRng::seed_from_u64(11);
        let vp = Viewport::new(800.0, 600.0);
        let set = generate(&LEVELS[3], vp, &mut rng);
        for b in &set.birds {
            let left_to_right = b.start.x == -EDGE_MARGIN && b.end.x == vp.width + EDGE_MARGIN;
            let right_to_left = b.start.x == vp.width + EDGE_MARGIN && b.end.x == -EDGE_MARGIN;
            assert!(left_to_right || right_to_left, "bird {} stays on one side", b.id);
            assert!((0.0..vp.height).contains(&b.start.y));
            assert!((0.0..vp.height).contains(&b.end.y));
            assert!((b.control.x - vp.width / 2.0).abs() <= CONTROL_JITTER);
            assert!((b.control.y - vp.height / 2.0).abs() <= CONTROL_JITTER);
        }
    }

    #[test]
    fn timing_and_appearance_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        for level in &LEVELS {
            let set = generate(level, Viewport::default(), &mut rng);
            let base = 10.0 / level.speed_range.0;
            for b in &set.birds {
                assert!(b.start_time >= 0.0 && b.start_time < level.stagger_window());
                assert!(b.duration >= base && b.duration < base + 0.5);
                assert!(b.size >= 15.0 && b.size < 30.0);
                assert!(b.wing_flap_speed >= 15.0 && b.wing_flap_speed < 25.0);
                assert!(BIRD_COLORS.contains(&b.color));
            }
        }
    }

    #[test]
    fn ids_are_unique_within_a_set() {
        let mut rng = StdRng::seed_from_u64(99);
        let set = generate(&LEVELS[4], Viewport::default(), &mut rng);
        let mut ids: Vec<u32> = set.birds.iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), set.birds.len());
    }

    #[test]
    fn zero_sized_viewport_collapses_heights() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = generate(&LEVELS[0], Viewport::new(0.0, 0.0), &mut rng);
        for b in &set.birds {
            assert_eq!(b.start.y, 0.0);
            assert_eq!(b.end.y, 0.0);
        }
    }
}
