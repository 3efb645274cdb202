/// Difficulty table.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelSpec {
    pub id: u32,
    pub name: &'static str,
    /// Added to the formation speed when this level is completed.
    pub alien_speed: f32,
    /// Formation spacing applied when this level is completed.
    pub spacing: f32,
}

pub const LEVELS: [LevelSpec; 5] = [
    LevelSpec { id: 1, name: "Beginner", alien_speed: 40.0, spacing: 35.0 },
    LevelSpec { id: 2, name: "Intermediate", alien_speed: 60.0, spacing: 40.0 },
    LevelSpec { id: 3, name: "Upper Intermediate", alien_speed: 65.0, spacing: 45.0 },
    LevelSpec { id: 4, name: "Pre-advanced", alien_speed: 70.0, spacing: 50.0 },
    LevelSpec { id: 5, name: "Advanced", alien_speed: 80.0, spacing: 55.0 },
];

pub fn level_count() -> u32 {
    LEVELS.len() as u32
}

/// Look up a 1-based level. Out-of-range ids yield `None`.
pub fn level(id: u32) -> Option<&'static LevelSpec> {
    id.checked_sub(1).and_then(|i| LEVELS.get(i as usize))
}

/// Score needed to leave `level`.
pub fn score_threshold(level: u32, score_per_level: u32) -> u32 {
    level.saturating_mul(score_per_level)
}
