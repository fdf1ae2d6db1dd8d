/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into the `front` buffer
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. Batch everything with `queue!` and flush once
///   5. Swap front/back
///
/// The playfield is in pixels; each entity's box is scaled onto whatever
/// grid the terminal offers below the HUD, at least one cell per entity.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use girder::domain::equipment::{Equipment, Weapon};
use girder::domain::geometry::{Body, Screen};
use girder::domain::physics::Collidable;
use girder::domain::projectile::ProjectileKind;
use girder::domain::rules::LevelOutcome;
use girder::sim::world::WorldState;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell, so row gaps match on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 14, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never equal to a real cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }

    fn fill(&mut self, area: CellRect, ch: char, fg: Color) {
        for y in area.row0..area.row1 {
            for x in area.col0..area.col1 {
                self.set(x, y, Cell::new(ch, fg));
            }
        }
    }
}

// ── Projection: pixel boxes onto the terminal grid ──

/// Half-open cell range covered by an entity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct CellRect {
    col0: usize,
    row0: usize,
    col1: usize,
    row1: usize,
}

/// The grid area the playfield is scaled into.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    top: usize,
    cols: usize,
    rows: usize,
}

impl Viewport {
    fn project(&self, body: &Body, screen: &Screen) -> CellRect {
        let sx = self.cols as f64 / screen.width;
        let sy = self.rows as f64 / screen.height;
        let col = |x: f64| (x * sx).clamp(0.0, self.cols as f64);
        let row = |y: f64| (y * sy).clamp(0.0, self.rows as f64);

        let col0 = col(body.left()).floor() as usize;
        let row0 = row(body.top()).floor() as usize;
        let col1 = (col(body.right()).ceil() as usize).max(col0 + 1);
        let row1 = (row(body.bottom()).ceil() as usize).max(row0 + 1);
        CellRect {
            col0,
            row0: row0 + self.top,
            col1: col1.min(self.cols.max(col0 + 1)),
            row1: row1.min(self.rows.max(row0 + 1)) + self.top,
        }
    }
}

// ── What to draw ──

/// One screen of the front-end.
pub enum View<'a> {
    Title { level_names: &'a [String], selected: usize },
    Playing(&'a WorldState),
    Result { won: bool, score: u32, seconds_left: u32 },
}

impl View<'_> {
    fn kind(&self) -> u8 {
        match self {
            View::Title { .. } => 0,
            View::Playing(_) => 1,
            View::Result { .. } => 2,
        }
    }
}

const HUD_ROW: usize = 0;
const FIELD_ROW: usize = 2;
/// HUD, gap and help line.
const RESERVED_ROWS: usize = FIELD_ROW + 1;

/// Beyond this the boss's health is shown as a count.
const MAX_HEARTS: u32 = 5;

const GIRDER: Color = Color::Rgb { r: 220, g: 60, b: 90 };
const LADDER: Color = Color::Rgb { r: 90, g: 200, b: 230 };
const BARREL: Color = Color::Rgb { r: 190, g: 120, b: 50 };
const BOSS: Color = Color::Rgb { r: 150, g: 90, b: 40 };
const HERO: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const ARMED: Color = Color::Rgb { r: 255, g: 220, b: 60 };
const MONKEY: Color = Color::Rgb { r: 200, g: 160, b: 110 };
const SHOT: Color = Color::Rgb { r: 120, g: 255, b: 120 };
const BANANA: Color = Color::Rgb { r: 255, g: 240, b: 90 };
const ACCENT: Color = Color::Rgb { r: 255, g: 200, b: 50 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_view: Option<u8>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_view: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, view: &View) -> io::Result<()> {
        if self.sync_size() {
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Clean slate on screen change
        if self.last_view != Some(view.kind()) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_view = Some(view.kind());
        }

        self.front.clear();
        match view {
            View::Title { level_names, selected } => self.compose_title(level_names, *selected),
            View::Playing(world) => self.compose_game(world),
            View::Result { won, score, seconds_left } => {
                self.compose_result(*won, *score, *seconds_left)
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Track the terminal size. Returns true if it changed.
    fn sync_size(&mut self) -> bool {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw == self.term_w && th == self.term_h {
            return false;
        }
        self.term_w = tw;
        self.term_h = th;
        self.front.resize(tw, th);
        self.back.resize(tw, th);
        self.back.cells.fill(Cell::INVALID);
        true
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState) {
        let screen = w.tuning.screen;
        let view = Viewport {
            top: FIELD_ROW,
            cols: self.front.width,
            rows: self.front.height.saturating_sub(RESERVED_ROWS),
        };
        if view.cols == 0 || view.rows == 0 { return; }

        // Back to front: scenery, pickups, hazards, actors, projectiles
        for platform in &w.platforms {
            self.front.fill(view.project(&platform.body, &screen), '=', GIRDER);
        }
        for ladder in &w.ladders {
            self.front.fill(view.project(&ladder.body, &screen), 'H', LADDER);
        }
        for pickup in w.pickups.iter().filter(|p| p.is_active()) {
            let ch = match pickup.weapon {
                Weapon::Hammer => 'T',
                Weapon::Blaster => 'r',
            };
            self.front.fill(view.project(&pickup.body, &screen), ch, ARMED);
        }
        for barrel in w.barrels.iter().filter(|b| b.is_active()) {
            self.front.fill(view.project(&barrel.body, &screen), 'O', BARREL);
        }
        self.front.fill(view.project(&w.boss.body, &screen), 'M', BOSS);
        for monkey in w.monkeys.iter().filter(|m| m.is_active()) {
            let ch = if monkey.is_intelligent() { '@' } else { 'm' };
            self.front.fill(view.project(&monkey.body, &screen), ch, MONKEY);
        }

        let (hero_ch, hero_fg) = match w.player.equipment {
            Equipment::Unarmed => ('P', HERO),
            Equipment::Hammer => ('#', ARMED),
            Equipment::Blaster { .. } => ('%', ARMED),
        };
        self.front.fill(view.project(&w.player.body, &screen), hero_ch, hero_fg);

        for shot in w.projectiles.iter().filter(|p| p.is_active()) {
            let (ch, fg) = match shot.kind {
                ProjectileKind::Bullet => ('-', SHOT),
                ProjectileKind::Banana => (')', BANANA),
            };
            self.front.fill(view.project(&shot.body, &screen), ch, fg);
        }

        self.compose_hud(w);
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let hearts = boss_hearts(w.boss_health());
        let hud = format!(
            " {}   SCORE {:06}   TIME {:03}   BOSS {:<5}   AMMO {}",
            w.level_name, w.score(), w.seconds_left(), hearts, w.ammo(),
        );
        self.front.put_str(0, HUD_ROW, &hud, ACCENT);

        let help = " ←→ walk  ↑↓ climb  SPACE jump  Z fire  ESC title";
        let row = self.front.height.saturating_sub(1);
        self.front.put_str(0, row, help, Color::DarkGrey);

        if let Some(outcome) = w.outcome() {
            let banner = match outcome {
                LevelOutcome::Won => "  LEVEL CLEAR!  ",
                LevelOutcome::Lost => "  GAME OVER  ",
            };
            let col = self.front.width.saturating_sub(banner.chars().count()) / 2;
            self.front.put_str(col, self.front.height / 2, banner, Color::White);
        }
    }

    fn compose_title(&mut self, level_names: &[String], selected: usize) {
        let title = [
            r"   ___  _           _           ",
            r"  / __|(_) _ _  __| | ___  _ _ ",
            r" | (_ || || '_|/ _` |/ -_)| '_|",
            r"  \___||_||_|  \__,_|\___||_|  ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(4, 2 + i, line, ACCENT);
        }
        self.front.put_str(6, 7, "Barrel Panic", GIRDER);

        let base = 10;
        for (i, name) in level_names.iter().enumerate() {
            let (marker, fg) = if i == selected { ("▸", SHOT) } else { (" ", Color::White) };
            let line = format!("{marker} {}  {name}", i + 1);
            self.front.put_str(8, base + i, &line, fg);
        }

        let help_row = base + level_names.len() + 1;
        self.front.put_str(8, help_row, "↑↓ / number: choose level   ENTER: start", Color::DarkGrey);
        self.front.put_str(8, help_row + 1, "ESC: quit", Color::DarkGrey);
    }

    fn compose_result(&mut self, won: bool, score: u32, seconds_left: u32) {
        let (headline, fg) = if won {
            ("★ THE BOSS IS DOWN! ★", ACCENT)
        } else {
            ("✕ GAME OVER ✕", HERO)
        };
        self.front.put_str(6, 4, headline, fg);
        self.front.put_str(8, 7, &format!("Final score:   {score}"), Color::White);
        self.front.put_str(8, 8, &format!("Time remaining: {seconds_left}s"), Color::White);
        self.front.put_str(8, 11, "ENTER: back to title   ESC: quit", Color::DarkGrey);
    }
}

fn boss_hearts(health: u32) -> String {
    if health <= MAX_HEARTS {
        "♥".repeat(health as usize)
    } else {
        format!("♥x{health}")
    }
}
