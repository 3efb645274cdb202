/// Host-facing facade: one live [`GameSession`] plus the input state, RNG
/// and high-score store that outlive it.
///
/// Resetting throws the session away wholesale and builds a new one; only
/// the config, the RNG stream and the best score carry over.

use rand::Rng;
use tracing::{info, warn};

use crate::compute::GameSession;
use crate::config::GameConfig;
use crate::entities::GameStatus;
use crate::events::{AudioCue, AudioSink};
use crate::input::{InputState, KeyEvent};
use crate::persistence::HighScoreStore;
use crate::snapshot::Snapshot;

pub struct Game<S: HighScoreStore, R: Rng> {
    config: GameConfig,
    session: GameSession,
    input: InputState,
    store: S,
    rng: R,
}

impl<S: HighScoreStore, R: Rng> Game<S, R> {
    /// Read the stored high score and build the first session. A store
    /// that cannot be read counts as "no high score yet".
    pub fn new(config: GameConfig, mut store: S, mut rng: R) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            warn!("Could not read high score, starting from 0: {}", e);
            0
        });
        let session = GameSession::new(config.clone(), high_score, &mut rng);
        Self {
            config,
            session,
            input: InputState::new(),
            store,
            rng,
        }
    }

    pub fn handle(&mut self, event: KeyEvent) {
        self.input.apply(event);
    }

    /// Run one frame and return the cues it raised.
    pub fn update(&mut self, dt: f32) -> Vec<AudioCue> {
        self.session.update(&mut self.input, dt, &mut self.rng);
        if let Some(score) = self.session.take_new_high_score() {
            match self.store.save(score) {
                Ok(()) => info!(score, "New high score saved"),
                Err(e) => warn!("Could not save high score {}: {}", score, e),
            }
        }
        self.session.drain_cues()
    }

    /// Same as [`Game::update`], but plays the cues on `sink`.
    pub fn update_with(&mut self, dt: f32, sink: &mut impl AudioSink) {
        for cue in self.update(dt) {
            sink.play(cue);
        }
    }

    /// Discard the current session and start over in `Loading`.
    pub fn reset(&mut self) {
        let high_score = self.session.high_score.max(self.session.player.score);
        self.session = GameSession::new(self.config.clone(), high_score, &mut self.rng);
        self.input = InputState::new();
        info!(high_score, "Session reset");
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Direct access for hosts and tests that stage scenarios.
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }
}
