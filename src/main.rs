mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, stdout, BufWriter, Stdout, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent as TermKeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use space_invaders::entities::GameStatus;
use space_invaders::events::{AudioCue, AudioSink};
use space_invaders::input::{Key, KeyEvent};
use space_invaders::persistence::FileStore;
use space_invaders::{Game, GameConfig};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Frames a freshly pressed movement key stays held before the terminal's
/// first auto-repeat arrives. OS initial repeat delays run 250 to 600 ms,
/// so 20 frames (≈660 ms) outlasts them.
const FIRST_REPEAT_WINDOW: u64 = 20;

/// Frames a repeating key stays held between repeat events. The OS repeat
/// rate is at least 15 Hz, so 4 frames (≈133 ms) is always refreshed.
const HOLD_WINDOW: u64 = 4;

/// Audio collaborator for the terminal: cues only go to the log.
struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue) {
        debug!(cue = cue.name(), "Audio cue");
    }
}

enum Action {
    Game(Key),
    Reset,
    Quit,
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::Game(Key::MoveLeft)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Action::Game(Key::MoveRight))
        }
        KeyCode::Char(' ') => Some(Action::Game(Key::Fire)),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Game(Key::Pause)),
        KeyCode::Enter => Some(Action::Game(Key::Confirm)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Reset),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

// ── Held keys ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Hold {
    last: u64,
    repeating: bool,
}

/// Every logical key remembers the frame of its last press/repeat event.
/// Release events (keyboard-enhancement terminals such as Ghostty or kitty)
/// release the key at once; on classic terminals the key expires after a
/// stretch of silence. Movement keys wait `FIRST_REPEAT_WINDOW` for their
/// first repeat and `HOLD_WINDOW` afterwards. Other keys are edge-triggered
/// in the core, so they always use `HOLD_WINDOW` and quick taps re-arm.
#[derive(Debug, Default)]
struct HeldKeys {
    keys: HashMap<Key, Hold>,
}

impl HeldKeys {
    /// Record a press or repeat. Returns `true` when the key was not held.
    fn press(&mut self, key: Key, frame: u64) -> bool {
        match self.keys.get_mut(&key) {
            Some(hold) => {
                hold.last = frame;
                hold.repeating = true;
                false
            }
            None => {
                self.keys.insert(key, Hold { last: frame, repeating: false });
                true
            }
        }
    }

    /// Returns `true` when the key was held.
    fn release(&mut self, key: Key) -> bool {
        self.keys.remove(&key).is_some()
    }

    /// Drop and return every key whose window ran out by `frame`.
    fn expire(&mut self, frame: u64) -> Vec<Key> {
        let stale: Vec<Key> = self
            .keys
            .iter()
            .filter(|&(&key, hold)| frame.saturating_sub(hold.last) > window(key, hold))
            .map(|(&key, _)| key)
            .collect();
        for key in &stale {
            self.keys.remove(key);
        }
        stale
    }

    fn clear(&mut self) {
        self.keys.clear();
    }
}

fn window(key: Key, hold: &Hold) -> u64 {
    match key {
        Key::MoveLeft | Key::MoveRight if !hold.repeating => FIRST_REPEAT_WINDOW,
        _ => HOLD_WINDOW,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// The core only ever sees clean `Pressed`/`Released` pairs, see `HeldKeys`.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game<FileStore, StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut sink = LogSink;
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(TermKeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match (map_key(code, modifiers), kind) {
                (Some(Action::Quit), KeyEventKind::Press) => return Ok(()),
                (Some(Action::Reset), KeyEventKind::Press) => {
                    if game.status() == GameStatus::GameOver {
                        game.reset();
                        held.clear();
                    }
                }
                (Some(Action::Game(key)), KeyEventKind::Press | KeyEventKind::Repeat) => {
                    if held.press(key, frame) {
                        game.handle(KeyEvent::Pressed(key));
                    }
                }
                (Some(Action::Game(key)), KeyEventKind::Release) => {
                    if held.release(key) {
                        game.handle(KeyEvent::Released(key));
                    }
                }
                _ => {}
            }
        }

        // Expire keys on terminals that never report releases.
        for key in held.expire(frame) {
            game.handle(KeyEvent::Released(key));
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;
        game.update_with(dt, &mut sink);

        let (width, height) = terminal::size()?;
        display::render(out, &game.snapshot(), width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw mode plus alternate screen for as long as the guard lives. Dropping it
/// restores the terminal, also when the game loop bails out with an error.
struct TerminalGuard {
    out: BufWriter<Stdout>,
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let mut out = BufWriter::new(stdout());
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        // Release events need the kitty keyboard protocol; other terminals
        // fall back to the hold window.
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(Self { out, keyboard_enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(config: &GameConfig) -> anyhow::Result<()> {
    let path = config
        .log_path
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("space_invaders.log"));
    let file = File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;

    // stdout is the game screen, so logs go to a file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("INVADERS_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = GameConfig::load_or_default();
    config.validate()?;
    init_logging(&config)?;

    info!("Space Invaders v{}", env!("CARGO_PKG_VERSION"));

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = FileStore::new(
        config
            .high_score_path
            .clone()
            .unwrap_or_else(FileStore::default_path),
    );
    let mut game = Game::new(config, store, rng);

    let mut term = TerminalGuard::enter()?;

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut term.out, &mut game, &rx);
    drop(term);

    info!(high_score = game.session().high_score, "Exiting");
    result
}
