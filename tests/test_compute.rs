use space_invaders::compute::*;
use space_invaders::config::GameConfig;
use space_invaders::entities::*;
use space_invaders::events::AudioCue;
use space_invaders::geometry::Vector2;
use space_invaders::input::{InputState, Key, KeyEvent};

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 0.016;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Aliens never fire, so scenarios are not disturbed by stray lasers.
fn quiet_config() -> GameConfig {
    GameConfig {
        shot_chance_first_level: 0.0,
        shot_chance_later_levels: 0.0,
        ..GameConfig::default()
    }
}

fn tap(session: &mut GameSession, input: &mut InputState, key: Key, rng: &mut StdRng) {
    input.apply(KeyEvent::Pressed(key));
    session.update(input, DT, rng);
    input.apply(KeyEvent::Released(key));
}

fn playing_session(rng: &mut StdRng) -> (GameSession, InputState) {
    let mut session = GameSession::new(quiet_config(), 0, rng);
    let mut input = InputState::new();
    tap(&mut session, &mut input, Key::Confirm, rng);
    assert_eq!(session.status, GameStatus::Playing);
    (session, input)
}

fn count(cues: &[AudioCue], cue: AudioCue) -> usize {
    cues.iter().filter(|&&c| c == cue).count()
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn new_session_waits_for_confirm() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(quiet_config(), 120, &mut rng);
    let mut input = InputState::new();

    assert_eq!(session.status, GameStatus::Loading);
    assert_eq!(session.current_level, 1);
    assert_eq!(session.high_score, 120);
    assert_eq!(session.formation.aliens.len(), 6 * 18);

    // Anything but confirm leaves the session idle.
    tap(&mut session, &mut input, Key::Fire, &mut rng);
    assert_eq!(session.status, GameStatus::Loading);
    assert_eq!(session.frame, 0);
    assert!(session.player.bullets.is_empty());

    tap(&mut session, &mut input, Key::Confirm, &mut rng);
    assert_eq!(session.status, GameStatus::Playing);
    // The starting frame itself does not simulate.
    assert_eq!(session.clock, 0.0);
}

#[test]
fn pause_freezes_the_simulation() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.update(&mut input, DT, &mut rng);
    let clock = session.clock;
    let formation_x = session.formation.origin.x;

    tap(&mut session, &mut input, Key::Pause, &mut rng);
    assert_eq!(session.status, GameStatus::Paused);

    input.apply(KeyEvent::Pressed(Key::MoveLeft));
    for _ in 0..10 {
        session.update(&mut input, DT, &mut rng);
    }
    input.apply(KeyEvent::Released(Key::MoveLeft));
    assert_eq!(session.clock, clock);
    assert_eq!(session.formation.origin.x, formation_x);
    assert_eq!(session.player.body.position(), Vector2::new(575.0, 750.0));

    tap(&mut session, &mut input, Key::Pause, &mut rng);
    assert_eq!(session.status, GameStatus::Playing);
    session.update(&mut input, DT, &mut rng);
    assert!(session.clock > clock);
}

#[test]
fn toggle_pause_is_ignored_outside_play() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(quiet_config(), 0, &mut rng);
    assert!(!session.toggle_pause());
    assert_eq!(session.status, GameStatus::Loading);

    session.start();
    session.end(Outcome::Victory);
    assert!(!session.toggle_pause());
    assert!(!session.start());
    assert_eq!(session.status, GameStatus::GameOver);
}

#[test]
fn end_fires_only_once() {
    let mut rng = seeded_rng();
    let (mut session, _) = playing_session(&mut rng);

    assert!(session.end(Outcome::Victory));
    assert!(!session.end(Outcome::Defeat(DefeatCause::Invaded)));
    assert_eq!(session.outcome, Some(Outcome::Victory));

    let cues = session.drain_cues();
    assert_eq!(count(&cues, AudioCue::Victory), 1);
    assert_eq!(count(&cues, AudioCue::Defeat), 0);
}

#[test]
fn game_over_is_frozen() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.end(Outcome::Defeat(DefeatCause::Invaded));
    let frame = session.frame;

    input.apply(KeyEvent::Pressed(Key::Fire));
    for _ in 0..5 {
        session.update(&mut input, DT, &mut rng);
    }
    assert_eq!(session.frame, frame);
    assert!(session.player.bullets.is_empty());
}

// ── Terminal conditions ───────────────────────────────────────────────────────

#[test]
fn last_life_ends_the_game_on_the_following_frame() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.player.lives = 1;
    session.lasers.push(Projectile::laser(
        Vector2::new(590.0, 740.0),
        Vector2::new(5.0, 15.0),
        800.0,
    ));

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.player.lives, 0);
    assert!(session.player.invincible);
    assert_eq!(session.player.sprite(), SpriteState::Dying);
    assert!(session.lasers.is_empty());
    assert_eq!(session.status, GameStatus::Playing);
    assert_eq!(count(&session.drain_cues(), AudioCue::PlayerHit), 1);

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.status, GameStatus::GameOver);
    assert_eq!(session.outcome, Some(Outcome::Defeat(DefeatCause::LivesExhausted)));
    assert_eq!(session.drain_cues(), vec![AudioCue::Defeat]);
}

#[test]
fn invincible_player_shrugs_off_lasers() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.lasers.push(Projectile::laser(
        Vector2::new(590.0, 740.0),
        Vector2::new(5.0, 15.0),
        800.0,
    ));
    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.player.lives, 2);

    // A second laser during the invincibility window does nothing.
    session.lasers.push(Projectile::laser(
        Vector2::new(590.0, 740.0),
        Vector2::new(5.0, 15.0),
        800.0,
    ));
    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.player.lives, 2);
    assert_eq!(count(&session.drain_cues(), AudioCue::PlayerHit), 1);
}

#[test]
fn clearing_the_formation_is_a_victory() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.player.score = 320;
    for alien in &mut session.formation.aliens {
        alien.alive = false;
    }
    let frame = session.frame;

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.status, GameStatus::GameOver);
    assert_eq!(session.outcome, Some(Outcome::Victory));
    assert_eq!(session.frame, frame);
    assert_eq!(session.high_score, 320);
    assert_eq!(session.take_new_high_score(), Some(320));
    assert_eq!(session.take_new_high_score(), None);
    assert_eq!(session.drain_cues(), vec![AudioCue::Victory]);
}

#[test]
fn formation_reaching_the_bottom_is_an_invasion() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.formation.aliens[0].body.set_position(600.0, 780.0);

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.status, GameStatus::GameOver);
    assert_eq!(session.outcome, Some(Outcome::Defeat(DefeatCause::Invaded)));
    assert_eq!(session.player.lives, 3);
}

#[test]
fn lower_score_does_not_claim_a_high_score() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(quiet_config(), 1_000, &mut rng);
    session.start();
    session.player.score = 400;
    session.end(Outcome::Defeat(DefeatCause::Invaded));
    assert_eq!(session.high_score, 1_000);
    assert_eq!(session.take_new_high_score(), None);
}

// ── Player actions ────────────────────────────────────────────────────────────

#[test]
fn held_fire_shoots_once_until_released() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    let mut cues = Vec::new();

    input.apply(KeyEvent::Pressed(Key::Fire));
    for _ in 0..10 {
        session.update(&mut input, 0.05, &mut rng);
        cues.extend(session.drain_cues());
    }
    assert_eq!(count(&cues, AudioCue::Shoot), 1);

    input.apply(KeyEvent::Released(Key::Fire));
    input.apply(KeyEvent::Pressed(Key::Fire));
    session.update(&mut input, 0.05, &mut rng);
    cues.extend(session.drain_cues());
    assert_eq!(count(&cues, AudioCue::Shoot), 2);
}

#[test]
fn rapid_taps_respect_the_shot_cooldown() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    let mut shots = 0;

    // Ten taps inside a quarter second.
    for _ in 0..10 {
        tap(&mut session, &mut input, Key::Fire, &mut rng);
        shots += count(&session.drain_cues(), AudioCue::Shoot);
    }
    assert_eq!(shots, 1);
}

#[test]
fn steering_moves_the_player_within_bounds() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);

    input.apply(KeyEvent::Pressed(Key::MoveRight));
    session.update(&mut input, 0.1, &mut rng);
    assert!((session.player.body.position().x - 605.0).abs() < 1e-3);

    for _ in 0..100 {
        session.update(&mut input, 0.1, &mut rng);
    }
    assert_eq!(session.player.body.position().x, session.config.player_max_x());
}

#[test]
fn shot_alien_dies_after_its_animation() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    let index = 5 * 18;
    let target = session.formation.aliens[index].clone();
    let pos = target.body.position();
    session.player.bullets.push(Projectile::bullet(
        Vector2::new(pos.x, pos.y + 10.0),
        session.config.bullet_size,
        session.config.bullet_speed,
    ));

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.player.score, target.points);
    assert!(session.formation.aliens[index].dying);
    assert!(session.player.bullets.is_empty());
    assert_eq!(session.snapshot().aliens[index].sprite, SpriteState::Dying);

    let mut cues = session.drain_cues();
    let mut frames = 0;
    while session.formation.aliens[index].alive {
        frames += 1;
        assert!(frames <= 10, "dying alien was never removed");
        session.update(&mut input, 0.1, &mut rng);
        cues.extend(session.drain_cues());
    }

    assert_eq!(count(&cues, AudioCue::AlienKilled), 1);
    assert_eq!(session.explosions.len(), 1);
    assert_eq!(session.formation.alive_count(), 6 * 18 - 1);
    let snap = session.snapshot();
    assert_eq!(snap.alive_aliens, 6 * 18 - 1);
    assert_eq!(snap.aliens.len(), 6 * 18 - 1);
    assert_eq!(snap.explosions.len(), 1);
}

// ── Level progression ─────────────────────────────────────────────────────────

#[test]
fn reaching_the_threshold_levels_up_once() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.player.score = 500;

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.current_level, 2);
    assert_eq!(session.formation.speed, 60.0);
    assert_eq!(session.formation.spacing, 35.0);
    assert!(session.zoom.is_some());
    assert_eq!(session.snapshot().level_name, "Intermediate");

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.current_level, 2);
    assert_eq!(count(&session.drain_cues(), AudioCue::LevelUp), 1);

    // Zoom runs for its full duration, then clears.
    for _ in 0..15 {
        session.update(&mut input, 0.1, &mut rng);
    }
    assert!(session.zoom.is_none());
    assert_eq!(session.snapshot().zoom_factor, 1.0);
}

#[test]
fn bullet_into_a_dying_alien_is_spent_without_scoring() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    let index = 5 * 18;
    session.formation.aliens[index].start_dying();
    let pos = session.formation.aliens[index].body.position();
    session.player.bullets.push(Projectile::bullet(
        Vector2::new(pos.x, pos.y + 10.0),
        session.config.bullet_size,
        session.config.bullet_speed,
    ));

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.player.score, 0);
    assert!(session.player.bullets.is_empty());
    assert!(!session.formation.aliens[index - 18].dying);
}

#[test]
fn level_up_right_after_a_bounce_is_not_an_invasion() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    let mut frames = 0;
    while !session.formation.sweep(1.0) {
        frames += 1;
        assert!(frames < 1_000, "formation never reached the margin");
    }
    let y = session.formation.origin.y;
    session.current_level = 4;
    session.player.score = 2_000;

    for _ in 0..120 {
        session.update(&mut input, DT, &mut rng);
    }
    assert_eq!(session.status, GameStatus::Playing);
    assert_eq!(session.current_level, 5);
    assert_eq!(session.formation.spacing, 50.0);
    assert_eq!(session.formation.origin.y, y);
}

#[test]
fn huge_score_levels_up_one_step_per_frame() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);
    session.player.score = 10_000;

    session.update(&mut input, DT, &mut rng);
    assert_eq!(session.current_level, 2);
    for _ in 0..10 {
        session.update(&mut input, DT, &mut rng);
    }
    assert_eq!(session.current_level, 5);
    assert_eq!(session.formation.spacing, 50.0);
    assert_eq!(session.formation.speed, 20.0 + 40.0 + 60.0 + 65.0 + 70.0);
}

#[test]
fn later_levels_use_the_higher_shot_chance() {
    let config = GameConfig::default();
    assert_eq!(config.shot_chance(1), 0.001);
    assert_eq!(config.shot_chance(2), 0.01);
    assert_eq!(config.shot_chance(5), 0.01);
}

// ── Frame delta handling ──────────────────────────────────────────────────────

#[test]
fn pathological_deltas_are_harmless() {
    let mut rng = seeded_rng();
    let (mut session, mut input) = playing_session(&mut rng);

    session.update(&mut input, f32::NAN, &mut rng);
    assert_eq!(session.clock, 0.0);
    assert_eq!(session.frame, 1);

    session.update(&mut input, -5.0, &mut rng);
    assert_eq!(session.clock, 0.0);

    input.apply(KeyEvent::Pressed(Key::MoveLeft));
    session.update(&mut input, 1_000.0, &mut rng);
    assert!((session.clock - 0.1).abs() < 1e-6);
    assert!((session.player.body.position().x - 545.0).abs() < 1e-3);
}
