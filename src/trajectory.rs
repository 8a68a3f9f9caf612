//! Per-frame bird poses along their Bézier paths.
//!
//! Everything here is a pure function of the bird set and the time since the
//! presentation started, so the canvas driver only has to draw what
//! [`positions_at`] returns and poll [`is_complete`].

use crate::birds::{Bird, Point};

/// Amplitude (px) of the wing tip oscillation.
pub const WING_FLAP_AMPLITUDE: f64 = 10.0;
/// Presentations never complete before this much time has passed (seconds).
pub const MIN_PRESENTATION_SECS: f64 = 0.5;

/// Where a bird is relative to its own flight window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlightStatus {
    Pending,
    Flying { elapsed: f64 },
    Finished,
}

/// Everything the renderer needs to draw one bird on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BirdPose {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub heading: f64, // radians, atan2 of the curve tangent
    pub flap: f64,    // wing tip offset in px
    pub size: f64,
    pub color: &'static str,
}

impl Bird {
    /// Flight state at `total` seconds after the presentation started.
    pub fn status_at(&self, total: f64) -> FlightStatus {
        let elapsed = total - self.start_time;
        if elapsed < 0.0 {
            FlightStatus::Pending
        } else if elapsed < self.duration {
            FlightStatus::Flying { elapsed }
        } else {
            FlightStatus::Finished
        }
    }

    /// Curve parameter for the bird's own elapsed time, clamped to `[0, 1]`.
    fn progress(&self, elapsed: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Position after `elapsed` seconds of the bird's own flight.
    pub fn position_at(&self, elapsed: f64) -> Point {
        bezier_point(self.start, self.control, self.end, self.progress(elapsed))
    }

    /// Heading (radians) after `elapsed` seconds of the bird's own flight.
    pub fn heading_at(&self, elapsed: f64) -> f64 {
        let d = bezier_tangent(self.start, self.control, self.end, self.progress(elapsed));
        d.y.atan2(d.x)
    }

    pub fn flap_at(&self, elapsed: f64) -> f64 {
        (elapsed * self.wing_flap_speed).sin() * WING_FLAP_AMPLITUDE
    }

    fn pose_at(&self, elapsed: f64) -> BirdPose {
        let p = self.position_at(elapsed);
        BirdPose {
            id: self.id,
            x: p.x,
            y: p.y,
            heading: self.heading_at(elapsed),
            flap: self.flap_at(elapsed),
            size: self.size,
            color: self.color,
        }
    }
}

/// Quadratic Bézier: (1-t)²·P0 + 2(1-t)t·P1 + t²·P2
pub fn bezier_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

/// Derivative of [`bezier_point`] with respect to `t`.
pub fn bezier_tangent(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        2.0 * u * (p1.x - p0.x) + 2.0 * t * (p2.x - p1.x),
        2.0 * u * (p1.y - p0.y) + 2.0 * t * (p2.y - p1.y),
    )
}

/// Poses of the birds currently in the air. Pending and finished birds are omitted.
pub fn positions_at(birds: &[Bird], total: f64) -> Vec<BirdPose> {
    birds
        .iter()
        .filter_map(|b| match b.status_at(total) {
            FlightStatus::Flying { elapsed } => Some(b.pose_at(elapsed)),
            FlightStatus::Pending | FlightStatus::Finished => None,
        })
        .collect()
}

/// True once every bird has finished and the minimum display time has passed.
pub fn is_complete(birds: &[Bird], total: f64) -> bool {
    is_complete_with_floor(birds, total, MIN_PRESENTATION_SECS)
}

pub fn is_complete_with_floor(birds: &[Bird], total: f64, floor_secs: f64) -> bool {
    total > floor_secs
        && birds
            .iter()
            .all(|b| matches!(b.status_at(total), FlightStatus::Finished))
}
