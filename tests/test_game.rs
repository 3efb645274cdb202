use space_invaders::config::GameConfig;
use space_invaders::entities::{GameStatus, Outcome};
use space_invaders::error::StoreError;
use space_invaders::events::{AudioCue, RecordingSink};
use space_invaders::input::{Key, KeyEvent};
use space_invaders::persistence::{FileStore, HighScoreStore, MemoryStore};
use space_invaders::Game;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_config() -> GameConfig {
    GameConfig {
        shot_chance_first_level: 0.0,
        shot_chance_later_levels: 0.0,
        ..GameConfig::default()
    }
}

fn started<S: HighScoreStore>(store: S) -> Game<S, StdRng> {
    let mut game = Game::new(quiet_config(), store, StdRng::seed_from_u64(42));
    game.handle(KeyEvent::Pressed(Key::Confirm));
    game.update(0.016);
    game.handle(KeyEvent::Released(Key::Confirm));
    assert_eq!(game.status(), GameStatus::Playing);
    game
}

fn wipe_out_formation<S: HighScoreStore>(game: &mut Game<S, StdRng>) {
    for alien in &mut game.session_mut().formation.aliens {
        alien.alive = false;
    }
}

/// Store whose every operation fails.
struct BrokenStore;

impl HighScoreStore for BrokenStore {
    fn load(&mut self) -> Result<u32, StoreError> {
        Err(StoreError::Corrupt("???".to_string()))
    }

    fn save(&mut self, _score: u32) -> Result<(), StoreError> {
        Err(StoreError::Corrupt("read-only".to_string()))
    }
}

#[test]
fn stored_high_score_seeds_the_session() {
    let game = Game::new(quiet_config(), MemoryStore::with_score(700), StdRng::seed_from_u64(1));
    assert_eq!(game.status(), GameStatus::Loading);
    assert_eq!(game.session().high_score, 700);
    assert_eq!(game.snapshot().high_score, 700);
}

#[test]
fn beating_the_high_score_saves_it_once() {
    let mut game = started(MemoryStore::with_score(300));
    game.session_mut().player.score = 900;
    wipe_out_formation(&mut game);

    let cues = game.update(0.016);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(cues, vec![AudioCue::Victory]);
    assert_eq!(game.store().score, 900);
    assert_eq!(game.store().saves, 1);

    game.update(0.016);
    game.update(0.016);
    assert_eq!(game.store().saves, 1);
}

#[test]
fn lower_score_is_not_saved() {
    let mut game = started(MemoryStore::with_score(5_000));
    game.session_mut().player.score = 100;
    wipe_out_formation(&mut game);

    game.update(0.016);
    assert_eq!(game.session().outcome, Some(Outcome::Victory));
    assert_eq!(game.store().saves, 0);
    assert_eq!(game.store().score, 5_000);
}

#[test]
fn reset_starts_over_and_keeps_the_best_score() {
    let mut game = started(MemoryStore::default());
    game.handle(KeyEvent::Pressed(Key::MoveLeft));
    for _ in 0..5 {
        game.update(0.05);
    }
    game.session_mut().player.score = 450;
    game.session_mut().player.lives = 1;
    wipe_out_formation(&mut game);
    game.update(0.016);
    assert_eq!(game.status(), GameStatus::GameOver);

    game.reset();
    let session = game.session();
    assert_eq!(session.status, GameStatus::Loading);
    assert_eq!(session.outcome, None);
    assert_eq!(session.player.score, 0);
    assert_eq!(session.player.lives, 3);
    assert_eq!(session.high_score, 450);
    assert_eq!(session.current_level, 1);
    assert_eq!(session.formation.alive_count(), 6 * 18);
    assert!(session.lasers.is_empty());
    assert_eq!(session.clock, 0.0);

    // Held keys from the previous session are forgotten.
    game.handle(KeyEvent::Pressed(Key::Confirm));
    game.update(0.016);
    game.update(0.1);
    assert_eq!(game.session().player.body.position().x, 575.0);
}

#[test]
fn update_with_plays_cues_on_the_sink() {
    let mut game = started(MemoryStore::default());
    let mut sink = RecordingSink::default();

    game.handle(KeyEvent::Pressed(Key::Fire));
    game.update_with(0.016, &mut sink);
    assert_eq!(sink.cues, vec![AudioCue::Shoot]);
}

#[test]
fn broken_store_never_stops_the_game() {
    let mut game = started(BrokenStore);
    assert_eq!(game.session().high_score, 0);

    game.session_mut().player.score = 50;
    wipe_out_formation(&mut game);
    game.update(0.016);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.session().high_score, 50);
}

#[test]
fn file_store_persists_across_games() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score");

    let mut game = started(FileStore::new(&path));
    game.session_mut().player.score = 1_230;
    wipe_out_formation(&mut game);
    game.update(0.016);

    let game = Game::new(quiet_config(), FileStore::new(&path), StdRng::seed_from_u64(2));
    assert_eq!(game.session().high_score, 1_230);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1230");
}
