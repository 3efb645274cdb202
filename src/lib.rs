//! Simulation core of a Space Invaders style arcade game.
//!
//! The core is frame driven and I/O free: a host feeds it key events and
//! frame deltas, reads back a [`snapshot::Snapshot`] to draw, and plays the
//! [`events::AudioCue`]s it raises.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod formation;
pub mod game;
pub mod geometry;
pub mod input;
pub mod levels;
pub mod persistence;
pub mod snapshot;

pub use compute::GameSession;
pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::Game;
