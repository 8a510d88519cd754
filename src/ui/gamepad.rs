/// Gamepad input using gilrs.
///
/// Turn-based: only presses matter, never holds. Each press (or stick
/// flick past the deadzone) yields at most one action.
///
/// Button mapping for pass/exit is loaded from config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Move (cardinal)
///   A (South)             →  Pass
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Action;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
    Up,
    Down,
    Left,
    Right,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            Button::DPadUp    => Some(Btn::Up),
            Button::DPadDown  => Some(Btn::Down),
            Button::DPadLeft  => Some(Btn::Left),
            Button::DPadRight => Some(Btn::Right),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    pass: Vec<Btn>,
    exit: Vec<Btn>,
}

impl ActionMap {
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String], fallback: Btn) -> Vec<Btn> {
            let list: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if list.is_empty() { vec![fallback] } else { list }
        }
        ActionMap {
            pass: parse_list(&cfg.pass, Btn::A),
            exit: parse_list(&cfg.exit, Btn::Select),
        }
    }

    /// D-pad always moves; exit wins over pass when a button is bound to both.
    fn action_for(&self, btn: Btn) -> Option<Action> {
        match btn {
            Btn::Up    => Some(Action::Move { dx: 0, dy: -1 }),
            Btn::Down  => Some(Action::Move { dx: 0, dy: 1 }),
            Btn::Left  => Some(Action::Move { dx: -1, dy: 0 }),
            Btn::Right => Some(Action::Move { dx: 1, dy: 0 }),
            b if self.exit.contains(&b) => Some(Action::Exit),
            b if self.pass.contains(&b) => Some(Action::Pass),
            _ => None,
        }
    }
}

/// Digital direction of the left stick, with gilrs' up-positive Y flipped
/// to screen coordinates. Diagonals are reduced to the dominant axis.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> (i32, i32) {
    let (ax, ay) = (x.abs(), y.abs());
    if ax.max(ay) < STICK_DEADZONE {
        (0, 0)
    } else if ax >= ay {
        (x.signum() as i32, 0)
    } else {
        (0, -(y.signum() as i32))
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    action_map: ActionMap,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: (f32, f32),
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: (i32, i32),
    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    tracing::debug!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            action_map: ActionMap::from_config(cfg),
            stick: (0.0, 0.0),
            stick_dir: (0, 0),
            connected,
        }
    }

    /// Drain pending pad events and return the first one that maps to an
    /// action. Absent pads yield nothing.
    pub fn poll_action(&mut self) -> Option<Action> {
        #[cfg(feature = "gamepad")]
        {
            self.poll_gilrs()
        }
        #[cfg(not(feature = "gamepad"))]
        {
            None
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) -> Option<Action> {
        let gilrs = self.gilrs.as_mut()?;
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        let mut action = None;
        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if action.is_none() {
                        action = Btn::from_gilrs(btn).and_then(|b| self.action_map.action_for(b));
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick.0 = value,
                        Axis::LeftStickY => self.stick.1 = value,
                        _ => continue,
                    }
                    let dir = stick_direction(self.stick.0, self.stick.1);
                    if dir != (0, 0) && dir != self.stick_dir && action.is_none() {
                        action = Some(Action::Move { dx: dir.0, dy: dir.1 });
                    }
                    self.stick_dir = dir;
                }
                EventType::Connected => {
                    self.connected = true;
                    tracing::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick = (0.0, 0.0);
                    self.stick_dir = (0, 0);
                    tracing::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
        action
    }
}
