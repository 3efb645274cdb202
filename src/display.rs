/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and a read-only snapshot of the
/// session. No game logic is performed; this module only maps the logical
/// play field onto terminal cells and emits terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_invaders::entities::{GameStatus, Outcome, SpriteState};
use space_invaders::geometry::Rect;
use space_invaders::snapshot::{Snapshot, SpriteView};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_INVINCIBLE: Color = Color::DarkGrey;
const C_ALIEN_ROWS: [Color; 5] = [
    Color::Magenta,
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
];
const C_DYING: Color = Color::DarkYellow;
const C_BULLET: Color = Color::Cyan;
const C_LASER: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Maps logical play-field coordinates onto the terminal grid inside the
/// border (rows 2..h-2, columns 1..w-1).
struct Viewport {
    cols: f32,
    rows: f32,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(snapshot: &Snapshot, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1) as f32;
        let rows = height.saturating_sub(4).max(1) as f32;
        Self {
            cols,
            rows,
            scale_x: cols / snapshot.play_width,
            scale_y: rows / snapshot.play_height,
        }
    }

    /// Terminal cell of a logical point, clipped to the play area.
    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let cx = (x * self.scale_x).clamp(0.0, self.cols - 1.0) as u16;
        let cy = (y * self.scale_y).clamp(0.0, self.rows - 1.0) as u16;
        (1 + cx, 2 + cy)
    }

    /// Centre cell of a box.
    fn centre(&self, rect: &Rect) -> (u16, u16) {
        self.cell(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, snapshot, width)?;

    if snapshot.status == GameStatus::Loading {
        draw_start_screen(out, snapshot, width, height)?;
    } else {
        let view = Viewport::new(snapshot, width, height);
        for alien in &snapshot.aliens {
            draw_alien(out, &view, alien)?;
        }
        for explosion in &snapshot.explosions {
            let (cx, cy) = view.cell(explosion.position.x, explosion.position.y);
            let glyph = if explosion.progress < 0.5 { "✶" } else { "·" };
            out.queue(cursor::MoveTo(cx, cy))?;
            out.queue(style::SetForegroundColor(C_EXPLOSION))?;
            out.queue(Print(glyph))?;
        }
        for bullet in &snapshot.bullets {
            draw_projectile(out, &view, bullet, "║", C_BULLET)?;
        }
        for laser in &snapshot.lasers {
            draw_projectile(out, &view, laser, "↓", C_LASER)?;
        }
        draw_player(out, &view, snapshot)?;

        if snapshot.zoom_progress.is_some() {
            draw_banner(out, width, height, "LEVEL UP!", C_HUD_LEVEL)?;
        }
        match snapshot.status {
            GameStatus::Paused => draw_banner(out, width, height, "PAUSED  (P to resume)", Color::White)?,
            GameStatus::GameOver => draw_game_over(out, snapshot, width, height)?,
            _ => {}
        }
    }

    draw_controls_hint(out, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snapshot: &Snapshot, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>6}  Hi:{:>6}",
        snapshot.player.score, snapshot.high_score
    )))?;

    let level_str = format!("[ {} · {} ]", snapshot.level, snapshot.level_name);
    let lx = (width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Lives:{}", "♥".repeat(snapshot.player.lives as usize));
    let rx = width.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, snapshot: &Snapshot) -> std::io::Result<()> {
    let p = &snapshot.player;
    let (cx, cy) = view.centre(&p.bounds);
    let (glyph, color) = match p.sprite {
        SpriteState::Dying => ("*╳*", C_DYING),
        SpriteState::Normal if p.invincible => ("/▲\\", C_PLAYER_INVINCIBLE),
        SpriteState::Normal => ("/▲\\", C_PLAYER),
    };
    out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), cy))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_alien<W: Write>(out: &mut W, view: &Viewport, alien: &SpriteView) -> std::io::Result<()> {
    let (cx, cy) = view.centre(&alien.bounds);
    let (glyph, color) = match alien.sprite {
        SpriteState::Dying => ("✸", C_DYING),
        SpriteState::Normal => {
            let row = (cy as usize) % C_ALIEN_ROWS.len();
            ("◆", C_ALIEN_ROWS[row])
        }
    };
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    view: &Viewport,
    projectile: &SpriteView,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let (cx, cy) = view.centre(&projectile.bounds);
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    draw_centered(out, width, height / 2, text, color)
}

fn draw_start_screen<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cy = height / 2;
    draw_centered(out, width, cy.saturating_sub(3), "★  SPACE  INVADERS  ★", Color::Cyan)?;
    if snapshot.high_score > 0 {
        let best = format!("Best Score: {}", snapshot.high_score);
        draw_centered(out, width, cy.saturating_sub(2), &best, Color::Yellow)?;
    }
    draw_centered(out, width, cy, "Press ENTER to play", Color::White)?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let (title, color) = match snapshot.outcome {
        Some(Outcome::Victory) => ("║  CRISIS  AVERTED!  ║", Color::Green),
        _ => ("║     GAME  OVER     ║", Color::Red),
    };
    let score = snapshot.player.score;
    let best_line = if score >= snapshot.high_score && score > 0 {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Best Score:  {:>6}", snapshot.high_score)
    };

    let start_row = (height / 2).saturating_sub(3);
    draw_centered(out, width, start_row, "╔════════════════════╗", color)?;
    draw_centered(out, width, start_row + 1, title, color)?;
    draw_centered(out, width, start_row + 2, "╚════════════════════╝", color)?;
    draw_centered(out, width, start_row + 3, &format!("Final Score: {:>6}", score), Color::Yellow)?;
    draw_centered(out, width, start_row + 4, &best_line, Color::DarkGrey)?;
    draw_centered(out, width, start_row + 5, "R - Play Again  Q - Quit", Color::White)?;
    Ok(())
}
