//! Fixed difficulty presets and the bird palette.
//!
//! Five levels are played in order, one round each. The level id doubles as the
//! scoring base (see [`LevelConfig::base_score`]).

#[cfg(feature = "serde")]
use serde::Serialize;

/// One difficulty preset (immutable).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LevelConfig {
    pub id: u32,
    pub bird_count_range: (u32, u32), // inclusive
    pub speed_range: (f64, f64),      // lower bound sets flight duration
    pub stay_duration: f64,           // seconds; descriptive only
    pub occlusion_density: f64,       // 0..1; descriptive only
    pub description: &'static str,
}

impl LevelConfig {
    /// Points for an exact answer before the streak bonus.
    pub fn base_score(&self) -> u32 {
        base_score(self.id)
    }

    /// Tighter start stagger for the dense final level.
    pub fn stagger_window(&self) -> f64 {
        if self.id == 5 { 0.3 } else { 0.8 }
    }
}

pub fn base_score(level_id: u32) -> u32 {
    if level_id == 5 { 100 } else { 10 * level_id }
}

pub static LEVELS: [LevelConfig; 5] = [
    LevelConfig {
        id: 1,
        bird_count_range: (3, 4),
        speed_range: (2.0, 3.0),
        stay_duration: 1.5,
        occlusion_density: 0.1,
        description: "入门：仔细观察，它们飞得很慢。",
    },
    LevelConfig {
        id: 2,
        bird_count_range: (4, 6),
        speed_range: (2.5, 3.5),
        stay_duration: 1.5,
        occlusion_density: 0.2,
        description: "初级：数量略微增加。",
    },
    LevelConfig {
        id: 3,
        bird_count_range: (5, 7),
        speed_range: (3.0, 4.0),
        stay_duration: 1.5,
        occlusion_density: 0.3,
        description: "中级：开始有重叠出现了。",
    },
    LevelConfig {
        id: 4,
        bird_count_range: (5, 10),
        speed_range: (6.0, 10.0),
        stay_duration: 1.0,
        occlusion_density: 0.5,
        description: "高级：速度变快，停留时间缩短。",
    },
    LevelConfig {
        id: 5,
        bird_count_range: (20, 40),
        speed_range: (10.0, 15.0),
        stay_duration: 0.5,
        occlusion_density: 0.8,
        description: "专家：极速挑战，密集成群！",
    },
];

pub const BIRD_COLORS: [&str; 6] = [
    "#fbbf24", // yellow
    "#f87171", // red
    "#60a5fa", // blue
    "#34d399", // green
    "#a78bfa", // purple
    "#f472b6", // pink
];
