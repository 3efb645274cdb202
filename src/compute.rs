/// Game state machine and the per-frame simulation pipeline.
///
/// A [`GameSession`] owns every piece of mutable game state. The host calls
/// [`GameSession::update`] once per tick with the sampled input, the frame
/// delta and an RNG handle; all randomness comes through that handle so
/// callers control determinism (tests use a seeded RNG).

use rand::Rng;
use tracing::{debug, info};

use crate::collision;
use crate::config::{GameConfig, MAX_ZOOM, PLAYER_SHOT_COOLDOWN, ZOOM_DURATION};
use crate::entities::{
    DefeatCause, EntityKind, Explosion, GameStatus, Outcome, Player, Projectile, SpriteState,
};
use crate::events::AudioCue;
use crate::formation::{Formation, FormationFrame};
use crate::geometry::ease_out_cubic;
use crate::input::{InputState, Key};
use crate::levels;
use crate::snapshot::{ExplosionView, PlayerView, Snapshot, SpriteView};

/// Clamp a raw frame delta: NaN and negative deltas become `0`, anything
/// above `max_dt` becomes `max_dt`.
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

/// Time-boxed level-up zoom. Runs alongside gameplay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomEffect {
    pub elapsed: f32,
}

impl ZoomEffect {
    pub fn progress(&self) -> f32 {
        (self.elapsed / ZOOM_DURATION).clamp(0.0, 1.0)
    }

    pub fn factor(&self) -> f32 {
        1.0 + (MAX_ZOOM - 1.0) * ease_out_cubic(self.progress())
    }
}

#[derive(Clone, Debug)]
pub struct GameSession {
    pub config: GameConfig,
    pub player: Player,
    pub formation: Formation,
    /// In-flight alien lasers, independent of the aliens that fired them.
    pub lasers: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub current_level: u32,
    pub status: GameStatus,
    pub outcome: Option<Outcome>,
    pub zoom: Option<ZoomEffect>,
    /// Seconds of simulated play.
    pub clock: f32,
    pub frame: u64,
    /// Best score known when the session started, raised on game over.
    pub high_score: u32,
    new_high_score: Option<u32>,
    cues: Vec<AudioCue>,
}

impl GameSession {
    /// Fresh session waiting in `Loading` for the confirm key.
    pub fn new(config: GameConfig, high_score: u32, rng: &mut impl Rng) -> Self {
        let player = Player::new(
            config.player_spawn(),
            config.player_size,
            config.player_speed,
            config.starting_lives,
        );
        let formation = Formation::new(&config, rng);
        Self {
            config,
            player,
            formation,
            lasers: Vec::new(),
            explosions: Vec::new(),
            current_level: 1,
            status: GameStatus::Loading,
            outcome: None,
            zoom: None,
            clock: 0.0,
            frame: 0,
            high_score,
            new_high_score: None,
            cues: Vec::new(),
        }
    }

    // ── State transitions ────────────────────────────────────────────────────

    /// `Loading → Playing`. Ignored in any other state.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Loading {
            return false;
        }
        info!("Session started");
        self.status = GameStatus::Playing;
        true
    }

    /// `Playing ⇄ Paused`. Ignored in any other state.
    pub fn toggle_pause(&mut self) -> bool {
        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            _ => return false,
        };
        debug!(status = ?self.status, "Pause toggled");
        true
    }

    /// Enter `GameOver`. Re-entry is a silent no-op.
    pub fn end(&mut self, outcome: Outcome) -> bool {
        if self.status == GameStatus::GameOver {
            return false;
        }
        self.status = GameStatus::GameOver;
        self.outcome = Some(outcome);
        self.cues.push(if outcome.is_victory() {
            AudioCue::Victory
        } else {
            AudioCue::Defeat
        });
        if self.player.score > self.high_score {
            self.high_score = self.player.score;
            self.new_high_score = Some(self.player.score);
        }
        info!(
            ?outcome,
            score = self.player.score,
            level = self.current_level,
            "Game over"
        );
        true
    }

    /// Score to persist, once, after a game over that beat the old best.
    pub fn take_new_high_score(&mut self) -> Option<u32> {
        self.new_high_score.take()
    }

    /// Cues raised since the last drain, in the order they happened.
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    /// Advance the session by one frame.
    ///
    /// Order while playing: terminal checks, player (input, movement,
    /// bullets), formation, lasers, collisions, level progression, effects.
    pub fn update(&mut self, input: &mut InputState, dt: f32, rng: &mut impl Rng) {
        let dt = sanitize_dt(dt, self.config.max_dt);

        match self.status {
            GameStatus::Loading => {
                if input.take_press(Key::Confirm) {
                    self.start();
                }
                input.clear_presses();
                return;
            }
            GameStatus::Paused => {
                if input.take_press(Key::Pause) {
                    self.toggle_pause();
                }
                input.clear_presses();
                return;
            }
            GameStatus::GameOver => {
                input.clear_presses();
                return;
            }
            GameStatus::Playing => {
                if input.take_press(Key::Pause) {
                    self.toggle_pause();
                    input.clear_presses();
                    return;
                }
            }
        }

        if self.check_terminal() {
            input.clear_presses();
            return;
        }

        self.frame += 1;
        self.clock += dt;

        self.update_player(input, dt);
        self.update_formation(dt, rng);
        self.update_lasers(dt);
        if self.resolve_collisions() {
            input.clear_presses();
            return;
        }
        self.update_level();
        self.update_effects(dt);
        input.clear_presses();
    }

    /// Lives exhausted or formation wiped out. Evaluated once at the start
    /// of every playing frame.
    fn check_terminal(&mut self) -> bool {
        if self.player.lives == 0 {
            return self.end(Outcome::Defeat(DefeatCause::LivesExhausted));
        }
        if self.formation.all_dead() {
            return self.end(Outcome::Victory);
        }
        false
    }

    fn update_player(&mut self, input: &mut InputState, dt: f32) {
        if input.wants_fire() && self.player.can_shoot(self.clock, PLAYER_SHOT_COOLDOWN) {
            self.player
                .shoot(self.clock, self.config.bullet_size, self.config.bullet_speed);
            input.consume_fire();
            self.cues.push(AudioCue::Shoot);
        }

        self.player.advance(
            dt,
            input.steer(),
            self.config.player_min_x(),
            self.config.player_max_x(),
        );
        self.player.update_bullets(dt, self.config.play_height);
    }

    fn update_formation(&mut self, dt: f32, rng: &mut impl Rng) {
        let frame = FormationFrame {
            now: self.clock,
            dt,
            shot_chance: self.config.shot_chance(self.current_level),
        };
        let report = self.formation.update(frame, &mut self.lasers, rng);
        for position in report.removed {
            self.explosions.push(Explosion::new(position));
            self.cues.push(AudioCue::AlienKilled);
        }
    }

    fn update_lasers(&mut self, dt: f32) {
        for laser in &mut self.lasers {
            laser.advance(dt, self.config.play_height);
        }
        self.lasers.retain(|l| l.alive);
    }

    /// Returns `true` when the formation invaded and the game ended.
    fn resolve_collisions(&mut self) -> bool {
        collision::bullets_vs_aliens(
            &mut self.player.bullets,
            &mut self.formation.aliens,
            &mut self.player.score,
        );
        self.player.bullets.retain(|b| b.alive);

        if collision::lasers_vs_player(&mut self.lasers, &mut self.player) {
            debug!(lives = self.player.lives, "Player hit");
            self.cues.push(AudioCue::PlayerHit);
            self.lasers.retain(|l| l.alive);
        }

        if collision::formation_reached_bottom(
            self.formation.lowest_y(),
            self.config.invasion_line(),
        ) {
            return self.end(Outcome::Defeat(DefeatCause::Invaded));
        }
        false
    }

    /// At most one level per frame; the completed level's table entry adds
    /// to the formation speed and sets its spacing.
    fn update_level(&mut self) {
        let threshold = levels::score_threshold(self.current_level, self.config.score_per_level);
        if self.player.score < threshold || self.current_level >= levels::level_count() {
            return;
        }
        let Some(completed) = levels::level(self.current_level) else {
            return;
        };
        self.formation
            .set_speed(self.formation.speed + completed.alien_speed);
        self.formation.apply_spacing(completed.spacing);
        self.current_level += 1;
        self.zoom = Some(ZoomEffect::default());
        self.cues.push(AudioCue::LevelUp);
        info!(
            level = self.current_level,
            speed = self.formation.speed,
            spacing = self.formation.spacing,
            "Level up"
        );
    }

    fn update_effects(&mut self, dt: f32) {
        if let Some(zoom) = &mut self.zoom {
            zoom.elapsed += dt;
            if zoom.elapsed >= ZOOM_DURATION {
                self.zoom = None;
            }
        }
        for explosion in &mut self.explosions {
            explosion.timer -= dt;
        }
        self.explosions.retain(|e| e.timer > 0.0);
    }

    // ── Render view ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        let projectile_view = |p: &Projectile| SpriteView {
            kind: p.entity_kind(),
            bounds: p.body.bounds(),
            sprite: SpriteState::Normal,
        };
        Snapshot {
            status: self.status,
            outcome: self.outcome,
            level: self.current_level,
            level_name: levels::level(self.current_level).map_or("", |l| l.name),
            high_score: self.high_score.max(self.player.score),
            player: PlayerView {
                bounds: self.player.body.bounds(),
                sprite: self.player.sprite(),
                invincible: self.player.invincible,
                lives: self.player.lives,
                score: self.player.score,
            },
            bullets: self.player.bullets.iter().filter(|b| b.alive).map(projectile_view).collect(),
            lasers: self.lasers.iter().filter(|l| l.alive).map(projectile_view).collect(),
            aliens: self
                .formation
                .aliens
                .iter()
                .filter(|a| a.alive)
                .map(|a| SpriteView {
                    kind: EntityKind::Alien,
                    bounds: a.body.bounds(),
                    sprite: a.sprite(),
                })
                .collect(),
            alive_aliens: self.formation.alive_count(),
            explosions: self
                .explosions
                .iter()
                .map(|e| ExplosionView {
                    position: e.position,
                    progress: e.progress(),
                })
                .collect(),
            zoom_progress: self.zoom.map(|z| z.progress()),
            zoom_factor: self.zoom.map_or(1.0, |z| z.factor()),
            play_width: self.config.play_width,
            play_height: self.config.play_height,
        }
    }
}
