/// Read-only view of a session for the renderer.

use crate::entities::{EntityKind, GameStatus, Outcome, SpriteState};
use crate::geometry::{Rect, Vector2};

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteView {
    pub kind: EntityKind,
    pub bounds: Rect,
    pub sprite: SpriteState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub bounds: Rect,
    pub sprite: SpriteState,
    pub invincible: bool,
    pub lives: u32,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExplosionView {
    pub position: Vector2,
    /// `0..=1`, how far the effect has played.
    pub progress: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub status: GameStatus,
    pub outcome: Option<Outcome>,
    pub level: u32,
    pub level_name: &'static str,
    pub high_score: u32,
    pub player: PlayerView,
    pub bullets: Vec<SpriteView>,
    pub lasers: Vec<SpriteView>,
    pub aliens: Vec<SpriteView>,
    pub alive_aliens: usize,
    pub explosions: Vec<ExplosionView>,
    /// Level-up animation progress, `None` when no animation is running.
    pub zoom_progress: Option<f32>,
    /// Eased zoom factor, `1.0` at rest.
    pub zoom_factor: f32,
    pub play_width: f32,
    pub play_height: f32,
}
