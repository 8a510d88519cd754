/// Keyboard input: a fixed key table resolved into `Action`s.
///
/// The game is turn-based, so `wait_action` blocks until a recognised key
/// (or pad press) arrives, polling at the configured rate. Unrecognised keys
/// and key releases are ignored.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Action;
use super::gamepad::GamepadState;

const fn mv(dx: i32, dy: i32) -> Option<Action> {
    Some(Action::Move { dx, dy })
}

/// Arrows, vi keys, numpad digits (5 waits), `.` waits, Esc/q/Ctrl+C quit.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Exit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up    | KeyCode::Char('k') | KeyCode::Char('8') => mv(0, -1),
        KeyCode::Down  | KeyCode::Char('j') | KeyCode::Char('2') => mv(0, 1),
        KeyCode::Left  | KeyCode::Char('h') | KeyCode::Char('4') => mv(-1, 0),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('6') => mv(1, 0),
        KeyCode::Char('y') | KeyCode::Char('7') | KeyCode::Home     => mv(-1, -1),
        KeyCode::Char('u') | KeyCode::Char('9') | KeyCode::PageUp   => mv(1, -1),
        KeyCode::Char('b') | KeyCode::Char('1') | KeyCode::End      => mv(-1, 1),
        KeyCode::Char('n') | KeyCode::Char('3') | KeyCode::PageDown => mv(1, 1),
        KeyCode::Char('.') | KeyCode::Char('5') => Some(Action::Pass),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Exit),
        _ => None,
    }
}

pub struct InputState {
    poll_interval: Duration,
    gamepad: GamepadState,
}

impl InputState {
    pub fn new(fps: u32, gamepad: GamepadState) -> Self {
        InputState {
            poll_interval: Duration::from_millis(1000 / u64::from(fps.max(1))),
            gamepad,
        }
    }

    /// Block until the player chooses an action.
    pub fn wait_action(&mut self) -> io::Result<Action> {
        loop {
            if event::poll(self.poll_interval)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    if let Some(action) = action_for_key(key) {
                        return Ok(action);
                    }
                    tracing::trace!(code = ?key.code, "unbound key");
                }
            }
            if let Some(action) = self.gamepad.poll_action() {
                return Ok(action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn eight_directions_from_every_scheme() {
        let schemes = [
            [KeyCode::Char('y'), KeyCode::Char('k'), KeyCode::Char('u'), KeyCode::Char('h'),
             KeyCode::Char('l'), KeyCode::Char('b'), KeyCode::Char('j'), KeyCode::Char('n')],
            [KeyCode::Char('7'), KeyCode::Char('8'), KeyCode::Char('9'), KeyCode::Char('4'),
             KeyCode::Char('6'), KeyCode::Char('1'), KeyCode::Char('2'), KeyCode::Char('3')],
        ];
        let expected = [
            (-1, -1), (0, -1), (1, -1), (-1, 0),
            (1, 0), (-1, 1), (0, 1), (1, 1),
        ];
        for scheme in schemes {
            for (code, (dx, dy)) in scheme.into_iter().zip(expected) {
                assert_eq!(action_for_key(key(code)), Some(Action::Move { dx, dy }), "{code:?}");
            }
        }
        assert_eq!(action_for_key(key(KeyCode::Left)), Some(Action::Move { dx: -1, dy: 0 }));
        assert_eq!(action_for_key(key(KeyCode::Down)), Some(Action::Move { dx: 0, dy: 1 }));
    }

    #[test]
    fn pass_and_exit() {
        assert_eq!(action_for_key(key(KeyCode::Char('5'))), Some(Action::Pass));
        assert_eq!(action_for_key(key(KeyCode::Char('.'))), Some(Action::Pass));
        assert_eq!(action_for_key(key(KeyCode::Esc)), Some(Action::Exit));
        assert_eq!(action_for_key(key(KeyCode::Char('q'))), Some(Action::Exit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(ctrl_c), Some(Action::Exit));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(action_for_key(key(KeyCode::Char('z'))), None);
        assert_eq!(action_for_key(key(KeyCode::Tab)), None);
        let ctrl_k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(ctrl_k), None);
    }
}
