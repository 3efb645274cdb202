/// Formation controller: the alien grid moving as a single block.
///
/// Per frame the block either sweeps sideways or steps down (never both),
/// dying aliens run their death timers, and each column may produce at
/// most one shot from its front-most alien.

use rand::Rng;

use crate::config::{GameConfig, ALIEN_COOLDOWN_MAX, ALIEN_COOLDOWN_MIN, ALIEN_POINTS};
use crate::entities::{Alien, Projectile};
use crate::geometry::Vector2;

/// What happened to the formation during one update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormationReport {
    pub stepped_down: bool,
    /// Positions of aliens whose death animation finished this frame.
    pub removed: Vec<Vector2>,
    pub shots_fired: usize,
}

/// Inputs the formation needs from the session for one update.
#[derive(Clone, Copy, Debug)]
pub struct FormationFrame {
    /// Session clock, seconds.
    pub now: f32,
    pub dt: f32,
    pub shot_chance: f64,
}

#[derive(Clone, Debug)]
pub struct Formation {
    /// Row-major creation order; iteration order is part of the contract.
    pub aliens: Vec<Alien>,
    /// Top-left of column 0 / row 0. Travels with the block.
    pub origin: Vector2,
    pub rows: usize,
    pub cols: usize,
    pub spacing: f32,
    /// `+1` sweeping right, `-1` sweeping left.
    pub direction: f32,
    pub speed: f32,
    pub step_down: f32,
    pub margin: f32,
    pub play_width: f32,
    pub laser_size: Vector2,
    pub laser_speed: f32,
}

impl Formation {
    /// Build the full grid described by `config`. Every alien gets its own
    /// randomised first cooldown so the columns do not open fire together.
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut formation = Self {
            aliens: Vec::with_capacity(config.formation_rows * config.formation_cols),
            origin: config.formation_origin,
            rows: config.formation_rows,
            cols: config.formation_cols,
            spacing: config.formation_spacing,
            direction: 1.0,
            speed: config.formation_speed,
            step_down: config.formation_step_down,
            margin: config.margin,
            play_width: config.play_width,
            laser_size: config.laser_size,
            laser_speed: config.laser_speed,
        };
        for row in 0..formation.rows {
            for col in 0..formation.cols {
                let position = formation.slot(row, col);
                let points = ALIEN_POINTS[row % ALIEN_POINTS.len()];
                let mut alien = Alien::new(position, config.alien_size, row, col, points);
                alien.shoot_cooldown = draw_cooldown(rng);
                formation.aliens.push(alien);
            }
        }
        formation
    }

    /// Grid position of `(row, col)` relative to the current origin.
    pub fn slot(&self, row: usize, col: usize) -> Vector2 {
        Vector2::new(
            self.origin.x + col as f32 * self.spacing,
            self.origin.y + row as f32 * self.spacing,
        )
    }

    pub fn alive_count(&self) -> usize {
        self.aliens.iter().filter(|a| a.alive).count()
    }

    pub fn all_dead(&self) -> bool {
        self.aliens.iter().all(|a| !a.alive)
    }

    /// Largest y among alive aliens, or `None` when none are left.
    pub fn lowest_y(&self) -> Option<f32> {
        self.aliens
            .iter()
            .filter(|a| a.alive)
            .map(|a| a.body.position().y)
            .reduce(f32::max)
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Re-space every alien horizontally, keeping its row and column.
    ///
    /// A wider block can end up past the right margin; it is pulled back
    /// inside so the next sweep is not a step-down.
    pub fn apply_spacing(&mut self, spacing: f32) {
        self.spacing = spacing;
        let origin_x = self.origin.x;
        for alien in &mut self.aliens {
            let y = alien.body.position().y;
            alien.body.set_position(origin_x + alien.col as f32 * spacing, y);
            alien.body.refresh_bounds();
        }
        self.pull_inside_right_margin();
    }

    /// Shift the whole block left until no alive alien crosses the right
    /// margin. The leftmost alive alien never moves past the left margin.
    fn pull_inside_right_margin(&mut self) {
        let right = self.play_width - self.margin;
        let (left_edge, right_edge) = self
            .aliens
            .iter()
            .filter(|a| a.alive)
            .map(|a| {
                let x = a.body.position().x;
                (x, x + a.body.size().x)
            })
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(l, r), (x, xr)| {
                (l.min(x), r.max(xr))
            });

        let overflow = right_edge - right;
        if overflow <= 0.0 {
            return;
        }
        let shift = overflow.min((left_edge - self.margin).max(0.0));
        self.origin.x -= shift;
        for alien in &mut self.aliens {
            alien.body.translate(-shift, 0.0);
            alien.body.refresh_bounds();
        }
    }

    /// Full per-frame formation update: sweep or step down, run death
    /// timers, then let each column's front alien try to shoot.
    pub fn update(
        &mut self,
        frame: FormationFrame,
        lasers: &mut Vec<Projectile>,
        rng: &mut impl Rng,
    ) -> FormationReport {
        let stepped_down = self.sweep(frame.dt);

        let mut removed = Vec::new();
        for alien in &mut self.aliens {
            if alien.tick_death(frame.dt) {
                removed.push(alien.body.position());
            }
        }

        let shots_fired = self.update_shooting(frame.now, frame.shot_chance, lasers, rng);

        FormationReport {
            stepped_down,
            removed,
            shots_fired,
        }
    }

    /// Move the block one frame. Returns `true` when this was a step-down
    /// frame (vertical move, direction flipped, no horizontal move).
    pub fn sweep(&mut self, dt: f32) -> bool {
        let x_velocity = self.speed * self.direction * dt;
        let left = self.margin;
        let right = self.play_width - self.margin;

        let step_down = self.aliens.iter().filter(|a| a.alive).any(|alien| {
            let next_x = alien.body.position().x + x_velocity;
            next_x <= left || next_x + alien.body.size().x >= right
        });

        if step_down {
            self.direction = -self.direction;
            self.origin.y += self.step_down;
        } else {
            self.origin.x += x_velocity;
        }

        for alien in self.aliens.iter_mut().filter(|a| a.alive) {
            if step_down {
                alien.body.translate(0.0, self.step_down);
            } else {
                alien.body.translate(x_velocity, 0.0);
            }
            alien.body.refresh_bounds();
        }

        step_down
    }

    /// Column of an alien derived from its position:
    /// `round((x - origin_x) / spacing)`.
    pub fn column_of(&self, alien: &Alien) -> i64 {
        ((alien.body.position().x - self.origin.x) / self.spacing).round() as i64
    }

    /// Index of the shooter for every column that has one, in column order.
    ///
    /// The shooter is the active (alive, not dying) alien with the largest
    /// y; ties go to the earliest alien in creation order.
    pub fn column_shooters(&self) -> Vec<usize> {
        let mut best: Vec<Option<usize>> = vec![None; self.cols];
        for (i, alien) in self.aliens.iter().enumerate() {
            if !alien.is_active() {
                continue;
            }
            let col = self.column_of(alien);
            if col < 0 || col as usize >= self.cols {
                continue;
            }
            let slot = &mut best[col as usize];
            let lower = match *slot {
                Some(j) => alien.body.position().y > self.aliens[j].body.position().y,
                None => true,
            };
            if lower {
                *slot = Some(i);
            }
        }
        best.into_iter().flatten().collect()
    }

    /// Double-gated shooting: cooldown elapsed AND a random draw under
    /// `chance`. Returns the number of lasers fired.
    pub fn update_shooting(
        &mut self,
        now: f32,
        chance: f64,
        lasers: &mut Vec<Projectile>,
        rng: &mut impl Rng,
    ) -> usize {
        let chance = chance.clamp(0.0, 1.0);
        let mut fired = 0;
        for i in self.column_shooters() {
            let shooter = &mut self.aliens[i];
            if now - shooter.last_shot_time > shooter.shoot_cooldown && rng.gen_bool(chance) {
                lasers.push(Projectile::laser(
                    shooter.muzzle(self.laser_size),
                    self.laser_size,
                    self.laser_speed,
                ));
                shooter.last_shot_time = now;
                shooter.shoot_cooldown = draw_cooldown(rng);
                fired += 1;
            }
        }
        fired
    }
}

fn draw_cooldown(rng: &mut impl Rng) -> f32 {
    rng.gen_range(ALIEN_COOLDOWN_MIN..=ALIEN_COOLDOWN_MAX)
}
