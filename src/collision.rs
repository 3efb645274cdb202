/// Collision resolver. Each pass mutates liveness, score and lives in
/// place and reports what it did; the session decides what follows.

use crate::entities::{Alien, Player, Projectile};
use crate::geometry::is_colliding;

/// Player bullets against aliens. A bullet stops at the first alive alien
/// it touches. An alien already playing its death animation still absorbs
/// the bullet, but scores nothing and keeps its running death timer.
///
/// Returns the number of aliens killed.
pub fn bullets_vs_aliens(bullets: &mut [Projectile], aliens: &mut [Alien], player_score: &mut u32) -> usize {
    let mut kills = 0;
    for bullet in bullets.iter_mut() {
        for alien in aliens.iter_mut() {
            if !bullet.alive {
                break;
            }
            if alien.alive && is_colliding(&bullet.body.bounds(), &alien.body.bounds()) {
                bullet.alive = false;
                if !alien.dying {
                    *player_score = player_score.saturating_add(alien.points);
                    alien.start_dying();
                    kills += 1;
                }
            }
        }
    }
    kills
}

/// Alien lasers against the player. At most one hit lands per frame.
///
/// Returns `true` when the player lost a life.
pub fn lasers_vs_player(lasers: &mut [Projectile], player: &mut Player) -> bool {
    if player.lives == 0 || player.invincible || player.dying {
        return false;
    }
    let player_box = player.body.bounds();
    for laser in lasers.iter_mut() {
        if laser.alive && is_colliding(&laser.body.bounds(), &player_box) {
            if player.take_hit() {
                laser.alive = false;
                return true;
            }
            return false;
        }
    }
    false
}

/// Whether the lowest alive alien has reached `invasion_line`.
pub fn formation_reached_bottom(lowest_alien_y: Option<f32>, invasion_line: f32) -> bool {
    lowest_alien_y.map_or(false, |y| y >= invasion_line)
}
