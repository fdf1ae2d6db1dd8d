/// Gamepad input tracker using gilrs.
///
/// Button mapping comes from `[gamepad]` in config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Walk / Climb
///   A                     →  Jump
///   X / B                 →  Fire
///   Start                 →  Confirm
///   Select                →  Back to title

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use girder::config::GamepadConfig;
use girder::domain::geometry::Facing;
use girder::domain::player::{ClimbDir, FrameInput};

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BUTTON_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

struct ActionMap {
    jump: Vec<Btn>,
    fire: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump: vec![Btn::A],
            fire: vec![Btn::X, Btn::B],
            confirm: vec![Btn::Start],
            cancel: vec![Btn::Select],
        }
    }
}

/// Directions, from the D-pad or the left stick.
#[derive(Clone, Copy, Debug, Default)]
struct Dirs {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Edge state per button: pressed since the last `update`.
    just_pressed: [bool; BUTTON_COUNT],
    dpad: Dirs,
    stick_x: f32,
    stick_y: f32,
    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                if let Some((_, pad)) = g.gamepads().next() {
                    tracing::info!(name = pad.name(), "gamepad connected");
                }
                Some(g)
            }
            Err(e) => {
                tracing::warn!(error = %e, "gamepad support unavailable");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            just_pressed: [false; BUTTON_COUNT],
            dpad: Dirs::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
        }
    }

    /// Apply the configured mapping. Lists with no recognizable button
    /// names keep their defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(target: &mut Vec<Btn>, names: &[String]) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *target = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.jump, &cfg.jump);
        apply(&mut map.fire, &cfg.fire);
        apply(&mut map.confirm, &cfg.confirm);
        apply(&mut map.cancel, &cfg.cancel);
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BUTTON_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else { return };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(axis, value, _) => match axis {
                    Axis::LeftStickX => self.stick_x = value,
                    Axis::LeftStickY => self.stick_y = value,
                    _ => {}
                },
                EventType::Disconnected => self.release_all(),
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadUp => self.dpad.up = held,
            Button::DPadDown => self.dpad.down = held,
            Button::DPadLeft => self.dpad.left = held,
            Button::DPadRight => self.dpad.right = held,
            other => {
                if let (Some(btn), true) = (Btn::from_gilrs(other), held) {
                    self.just_pressed[btn as usize] = true;
                }
            }
        }
    }

    // ── Action queries ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }

    /// This frame's gameplay input from the pad alone.
    pub fn frame_input(&self) -> FrameInput {
        let left = self.dpad.left || self.stick_x < -STICK_DEADZONE;
        let right = self.dpad.right || self.stick_x > STICK_DEADZONE;
        let up = self.dpad.up || self.stick_y > STICK_DEADZONE;
        let down = self.dpad.down || self.stick_y < -STICK_DEADZONE;

        FrameInput {
            horizontal: if left { Some(Facing::Left) } else if right { Some(Facing::Right) } else { None },
            vertical: if up { Some(ClimbDir::Up) } else if down { Some(ClimbDir::Down) } else { None },
            jump: self.any_just_pressed(&self.action_map.jump),
            fire: self.any_just_pressed(&self.action_map.fire),
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.just_pressed = [false; BUTTON_COUNT];
        self.dpad = Dirs::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

/// Merge keyboard and pad: either source can drive each field.
pub fn merge(keys: FrameInput, pad: FrameInput) -> FrameInput {
    FrameInput {
        horizontal: keys.horizontal.or(pad.horizontal),
        vertical: keys.vertical.or(pad.vertical),
        jump: keys.jump || pad.jump,
        fire: keys.fire || pad.fire,
    }
}
