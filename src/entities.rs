/// All game entity types: data plus the per-entity movement rules.
///
/// Every actor is composed from a [`Body`] (position, scale, bounding box)
/// and its kind-specific state. Nothing here knows about other entities;
/// group behaviour lives in `formation`, `collision` and `compute`.

use crate::config::{
    ALIEN_COOLDOWN_MIN, ALIEN_DEATH_TIME, EXPLOSION_TIME, INVINCIBILITY_TIME, PLAYER_DEATH_TIME,
};
use crate::geometry::{clamp, Rect, Vector2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Bullet,
    Laser,
    Alien,
}

/// Which sprite a renderer should pick for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteState {
    Normal,
    Dying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Loading,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefeatCause {
    /// The last life was lost to a laser.
    LivesExhausted,
    /// The formation reached the bottom of the field.
    Invaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat(DefeatCause),
}

impl Outcome {
    pub fn is_victory(&self) -> bool {
        matches!(self, Outcome::Victory)
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Movable, drawable capability shared by every entity.
///
/// The bounding box is cached and marked dirty by any position or scale
/// change. [`Body::bounds`] never hands out a stale box: a dirty body
/// computes a fresh one on the spot.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    position: Vector2,
    scale: Vector2,
    size: Vector2,
    bounds: Rect,
    dirty: bool,
}

impl Body {
    pub fn new(position: Vector2, size: Vector2) -> Self {
        let mut body = Self {
            position,
            scale: Vector2::ONE,
            size,
            bounds: Rect::default(),
            dirty: true,
        };
        body.refresh_bounds();
        body
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn scale(&self) -> Vector2 {
        self.scale
    }

    pub fn size(&self) -> Vector2 {
        self.size
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vector2::new(x, y);
        self.dirty = true;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.set_position(self.position.x + dx, self.position.y + dy);
    }

    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = Vector2::new(x, y);
        self.dirty = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.dirty
    }

    pub fn refresh_bounds(&mut self) {
        if self.dirty {
            self.bounds = self.compute_bounds();
            self.dirty = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        if self.dirty {
            self.compute_bounds()
        } else {
            self.bounds
        }
    }

    fn compute_bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.size.x * self.scale.x,
            self.size.y * self.scale.y,
        )
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Fired upward by the player.
    Bullet,
    /// Fired downward by aliens.
    Laser,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
    /// `+1` travels up the screen, `-1` travels down.
    pub direction: f32,
    pub speed: f32,
    pub alive: bool,
}

impl Projectile {
    pub fn bullet(position: Vector2, size: Vector2, speed: f32) -> Self {
        Self {
            body: Body::new(position, size),
            kind: ProjectileKind::Bullet,
            direction: 1.0,
            speed,
            alive: true,
        }
    }

    pub fn laser(position: Vector2, size: Vector2, speed: f32) -> Self {
        Self {
            body: Body::new(position, size),
            kind: ProjectileKind::Laser,
            direction: -1.0,
            speed,
            alive: true,
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self.kind {
            ProjectileKind::Bullet => EntityKind::Bullet,
            ProjectileKind::Laser => EntityKind::Laser,
        }
    }

    /// Move along the vertical axis. Reaching the top (bullets) or the
    /// bottom (lasers) of the field kills the projectile for good.
    pub fn advance(&mut self, dt: f32, play_height: f32) {
        if !self.alive {
            return;
        }
        let pos = self.body.position();
        let mut y = pos.y - self.direction * self.speed * dt;
        match self.kind {
            ProjectileKind::Bullet => {
                y = clamp(y, 0.0, play_height - self.body.size().y);
                if y <= 0.0 {
                    self.alive = false;
                }
            }
            ProjectileKind::Laser => {
                if y >= play_height {
                    self.alive = false;
                }
            }
        }
        self.body.set_position(pos.x, y);
        self.body.refresh_bounds();
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub lives: u32,
    pub score: u32,
    /// Insertion order is firing order.
    pub bullets: Vec<Projectile>,
    /// Session clock value of the last shot, if any.
    pub last_shot_time: Option<f32>,
    pub dying: bool,
    pub death_timer: f32,
    pub invincible: bool,
    pub invincible_timer: f32,
}

impl Player {
    pub fn new(spawn: Vector2, size: Vector2, speed: f32, lives: u32) -> Self {
        Self {
            body: Body::new(spawn, size),
            speed,
            lives,
            score: 0,
            bullets: Vec::new(),
            last_shot_time: None,
            dying: false,
            death_timer: 0.0,
            invincible: false,
            invincible_timer: 0.0,
        }
    }

    pub fn sprite(&self) -> SpriteState {
        if self.dying || self.lives == 0 {
            SpriteState::Dying
        } else {
            SpriteState::Normal
        }
    }

    /// One frame of player motion. `steer` is `-1`, `0` or `+1`.
    ///
    /// While dying only the death timer runs. Otherwise the position is
    /// clamped to `[min_x, max_x]` both before and after the steering delta.
    pub fn advance(&mut self, dt: f32, steer: f32, min_x: f32, max_x: f32) {
        if self.dying {
            self.death_timer -= dt;
            if self.death_timer <= 0.0 {
                self.dying = false;
                self.death_timer = 0.0;
            }
            return;
        }

        if self.invincible {
            self.invincible_timer -= dt;
            if self.invincible_timer <= 0.0 {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }

        let pos = self.body.position();
        let x = clamp(pos.x, min_x, max_x) + steer * self.speed * dt;
        self.body.set_position(clamp(x, min_x, max_x), pos.y);
        self.body.refresh_bounds();
    }

    /// Apply a lethal laser hit. Returns `false` when the hit is absorbed
    /// (no lives left, already dying, or invincible).
    pub fn take_hit(&mut self) -> bool {
        if self.lives == 0 || self.dying || self.invincible {
            return false;
        }
        self.lives -= 1;
        self.dying = true;
        self.death_timer = PLAYER_DEATH_TIME;
        self.invincible = true;
        self.invincible_timer = INVINCIBILITY_TIME;
        true
    }

    pub fn can_shoot(&self, now: f32, cooldown: f32) -> bool {
        !self.dying
            && self.lives > 0
            && self.last_shot_time.map_or(true, |last| now - last >= cooldown)
    }

    /// Fire a bullet from the top-centre of the ship.
    pub fn shoot(&mut self, now: f32, bullet_size: Vector2, bullet_speed: f32) {
        let pos = self.body.position();
        let x = pos.x + self.body.size().x / 2.0 - bullet_size.x / 2.0;
        self.bullets
            .push(Projectile::bullet(Vector2::new(x, pos.y), bullet_size, bullet_speed));
        self.last_shot_time = Some(now);
    }

    /// Advance every bullet and drop the dead ones.
    pub fn update_bullets(&mut self, dt: f32, play_height: f32) {
        for bullet in &mut self.bullets {
            bullet.advance(dt, play_height);
        }
        self.bullets.retain(|b| b.alive);
    }
}

// ── Alien ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    pub body: Body,
    pub row: usize,
    pub col: usize,
    pub points: u32,
    pub alive: bool,
    pub dying: bool,
    pub death_timer: f32,
    pub last_shot_time: f32,
    pub shoot_cooldown: f32,
}

impl Alien {
    pub fn new(position: Vector2, size: Vector2, row: usize, col: usize, points: u32) -> Self {
        Self {
            body: Body::new(position, size),
            row,
            col,
            points,
            alive: true,
            dying: false,
            death_timer: 0.0,
            last_shot_time: 0.0,
            shoot_cooldown: ALIEN_COOLDOWN_MIN,
        }
    }

    pub fn sprite(&self) -> SpriteState {
        if self.dying {
            SpriteState::Dying
        } else {
            SpriteState::Normal
        }
    }

    /// Alive and not already playing its death animation.
    pub fn is_active(&self) -> bool {
        self.alive && !self.dying
    }

    pub fn start_dying(&mut self) {
        self.dying = true;
        self.death_timer = ALIEN_DEATH_TIME;
    }

    /// Count down the death animation. Returns `true` on the frame the
    /// alien is permanently removed.
    pub fn tick_death(&mut self, dt: f32) -> bool {
        if !(self.alive && self.dying) {
            return false;
        }
        self.death_timer -= dt;
        if self.death_timer <= 0.0 {
            self.alive = false;
            self.dying = false;
            self.death_timer = 0.0;
            return true;
        }
        false
    }

    /// Bottom-centre muzzle position for a laser of `laser_size`.
    pub fn muzzle(&self, laser_size: Vector2) -> Vector2 {
        let pos = self.body.position();
        let size = self.body.size();
        Vector2::new(pos.x + size.x / 2.0 - laser_size.x / 2.0, pos.y + size.y)
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// A brief visual explosion left behind when an alien is removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub position: Vector2,
    /// Remaining seconds to display.
    pub timer: f32,
}

impl Explosion {
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            timer: EXPLOSION_TIME,
        }
    }

    /// Fraction of the effect already played, `0..=1`.
    pub fn progress(&self) -> f32 {
        clamp(1.0 - self.timer / EXPLOSION_TIME, 0.0, 1.0)
    }
}
