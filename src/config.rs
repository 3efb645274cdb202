/// Tunables for a game session plus host-level settings.
///
/// Everything has a sensible default; `load_or_default` lets the
/// `INVADERS_*` environment variables override a handful of them.

use std::path::PathBuf;

use crate::error::{GameError, GameResult};
use crate::geometry::Vector2;

// ── Timers (seconds) ──────────────────────────────────────────────────────────

pub const ALIEN_DEATH_TIME: f32 = 0.5;
pub const PLAYER_DEATH_TIME: f32 = 0.8;
pub const INVINCIBILITY_TIME: f32 = 2.0;
pub const PLAYER_SHOT_COOLDOWN: f32 = 0.3;
pub const ALIEN_COOLDOWN_MIN: f32 = 1.0;
pub const ALIEN_COOLDOWN_MAX: f32 = 3.0;
pub const EXPLOSION_TIME: f32 = 0.4;
pub const ZOOM_DURATION: f32 = 1.0;
pub const MAX_ZOOM: f32 = 1.5;

/// Points per alien, cycled by row from the top.
pub const ALIEN_POINTS: [u32; 5] = [50, 40, 30, 20, 10];

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub play_width: f32,
    pub play_height: f32,
    /// Left/right margin shared by the player clamp and the formation sweep.
    pub margin: f32,

    pub player_size: Vector2,
    pub player_speed: f32,
    pub starting_lives: u32,
    pub bullet_size: Vector2,
    pub bullet_speed: f32,
    pub laser_size: Vector2,
    pub laser_speed: f32,

    pub alien_size: Vector2,
    pub formation_origin: Vector2,
    pub formation_rows: usize,
    pub formation_cols: usize,
    pub formation_spacing: f32,
    pub formation_speed: f32,
    pub formation_step_down: f32,
    /// Subtracted from the player height when deciding that the formation
    /// has reached the bottom of the field.
    pub boundary_offset: f32,

    /// Per-column firing chance on level 1, and on every later level.
    pub shot_chance_first_level: f64,
    pub shot_chance_later_levels: f64,
    pub score_per_level: u32,

    /// Upper bound applied to every frame delta.
    pub max_dt: f32,

    pub seed: Option<u64>,
    pub high_score_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_width: 1200.0,
            play_height: 800.0,
            margin: 50.0,

            player_size: Vector2::new(50.0, 40.0),
            player_speed: 300.0,
            starting_lives: 3,
            bullet_size: Vector2::new(5.0, 15.0),
            bullet_speed: 1000.0,
            laser_size: Vector2::new(5.0, 15.0),
            laser_speed: 800.0,

            alien_size: Vector2::new(25.0, 25.0),
            formation_origin: Vector2::new(50.0, 50.0),
            formation_rows: 6,
            formation_cols: 18,
            formation_spacing: 35.0,
            formation_speed: 20.0,
            formation_step_down: 10.0,
            boundary_offset: 70.0,

            shot_chance_first_level: 0.001,
            shot_chance_later_levels: 0.01,
            score_per_level: 500,

            max_dt: 0.1,

            seed: None,
            high_score_path: None,
            log_path: None,
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("INVADERS_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid INVADERS_SEED '{}', using entropy", seed),
            }
        }

        if let Ok(lives) = std::env::var("INVADERS_LIVES") {
            match lives.parse::<u32>() {
                Ok(parsed) if (1..=9).contains(&parsed) => config.starting_lives = parsed,
                _ => tracing::warn!("INVADERS_LIVES must be 1-9, got '{}', using default", lives),
            }
        }

        if let Ok(max_dt) = std::env::var("INVADERS_MAX_DT") {
            match max_dt.parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed > 0.0 => config.max_dt = parsed,
                _ => tracing::warn!("Invalid INVADERS_MAX_DT '{}', using default", max_dt),
            }
        }

        if let Ok(path) = std::env::var("INVADERS_HIGH_SCORE_PATH") {
            config.high_score_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("INVADERS_LOG_FILE") {
            config.log_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> GameResult<()> {
        if self.play_width <= 2.0 * self.margin + self.player_size.x {
            return Err(GameError::Config(
                "play_width leaves no room between the margins".to_string(),
            ));
        }
        if self.play_height <= self.player_size.y {
            return Err(GameError::Config("play_height is smaller than the player".to_string()));
        }
        if self.formation_spacing <= 0.0 {
            return Err(GameError::Config("formation_spacing must be positive".to_string()));
        }
        let widest = crate::levels::LEVELS
            .iter()
            .map(|l| l.spacing)
            .fold(self.formation_spacing, f32::max);
        let block = self.formation_cols.saturating_sub(1) as f32 * widest + self.alien_size.x;
        if block >= self.play_width - 2.0 * self.margin {
            return Err(GameError::Config(format!(
                "a formation {block} wide does not fit between the margins"
            )));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(GameError::Config("max_dt must be positive".to_string()));
        }
        if self.score_per_level == 0 {
            return Err(GameError::Config("score_per_level must be at least 1".to_string()));
        }
        for chance in [self.shot_chance_first_level, self.shot_chance_later_levels] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GameError::Config(format!("shot chance {chance} is not a probability")));
            }
        }
        Ok(())
    }

    /// Firing chance of a single eligible column shooter on `level`.
    pub fn shot_chance(&self, level: u32) -> f64 {
        if level > 1 {
            self.shot_chance_later_levels
        } else {
            self.shot_chance_first_level
        }
    }

    /// Left edge of the player clamp range.
    pub fn player_min_x(&self) -> f32 {
        self.margin
    }

    /// Right edge of the player clamp range.
    pub fn player_max_x(&self) -> f32 {
        self.play_width - self.player_size.x
    }

    /// Player spawn point: horizontally centred, ten units above the floor.
    pub fn player_spawn(&self) -> Vector2 {
        Vector2::new(
            (self.play_width - self.player_size.x) / 2.0,
            self.play_height - self.player_size.y - 10.0,
        )
    }

    /// Y at which a descending formation counts as having invaded.
    pub fn invasion_line(&self) -> f32 {
        self.play_height + (self.player_size.y - self.boundary_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.play_width, 1200.0);
        assert_eq!(config.play_height, 800.0);
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.score_per_level, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invasion_line() {
        let config = GameConfig::default();
        assert_eq!(config.invasion_line(), 770.0);
    }

    #[test]
    fn test_shot_chance_rises_after_first_level() {
        let config = GameConfig::default();
        assert!(config.shot_chance(2) > config.shot_chance(1));
        assert_eq!(config.shot_chance(5), config.shot_chance(2));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameConfig::default();
        config.formation_spacing = 0.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.max_dt = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.shot_chance_later_levels = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_formation_wider_than_field() {
        // 18 columns at the widest level spacing need more than 800 units.
        let config = GameConfig {
            play_width: 800.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default() {
        let config = GameConfig::load_or_default();
        assert!(config.max_dt > 0.0);
    }
}
