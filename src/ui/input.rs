/// Keyboard tracker: turns terminal key events into a per-frame `FrameInput`.
///
/// Terminals rarely report key releases, so a key counts as held until
/// `HOLD_TIMEOUT` passes without a Press/Repeat for it. Release events,
/// when a terminal does send them, end the hold immediately.
///
/// Bindings:
///   ← → / A D       walk
///   ↑ ↓ / W S       climb
///   Space           jump (fresh press only)
///   Z / F           fire (fresh press only)

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use girder::domain::geometry::Facing;
use girder::domain::player::{ClimbDir, FrameInput};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const JUMP: &[KeyCode] = &[KeyCode::Char(' ')];
const FIRE: &[KeyCode] = &[KeyCode::Char('z'), KeyCode::Char('Z'), KeyCode::Char('f'), KeyCode::Char('F')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events from the last drain, for Ctrl+C detection.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame, before
    /// sampling.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else { continue };
            self.record(key);
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn record(&mut self, key: KeyEvent) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release => {
                self.last_active.remove(&key.code);
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Sample this frame's gameplay input. Left wins over right, up over
    /// down, when both are held.
    pub fn frame_input(&self) -> FrameInput {
        let horizontal = if self.any_held(LEFT) {
            Some(Facing::Left)
        } else if self.any_held(RIGHT) {
            Some(Facing::Right)
        } else {
            None
        };
        let vertical = if self.any_held(UP) {
            Some(ClimbDir::Up)
        } else if self.any_held(DOWN) {
            Some(ClimbDir::Down)
        } else {
            None
        };
        FrameInput {
            horizontal,
            vertical,
            jump: self.any_pressed(JUMP),
            fire: self.any_pressed(FIRE),
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Edge trigger: pressed this frame after not being held.
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }
}
