/// Events emitted by the creature phase of a turn.
/// The loop logs them and shows the latest on the status line.

use std::fmt;

use crate::domain::entity::Stage;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    CreatureSpawned { x: i32, y: i32 },
    CreatureReproduced { parent: (i32, i32), x: i32, y: i32 },
    CreatureGrew { x: i32, y: i32, stage: Stage },
    SpawnBlocked { x: i32, y: i32 },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::CreatureSpawned { x, y } => write!(f, "A creature appears at {x},{y}"),
            GameEvent::CreatureReproduced { x, y, .. } => write!(f, "A creature multiplies into {x},{y}"),
            GameEvent::CreatureGrew { stage: Stage::Elder, .. } => write!(f, "A creature reaches its elder form"),
            GameEvent::CreatureGrew { .. } => write!(f, "A creature grows"),
            GameEvent::SpawnBlocked { .. } => write!(f, "A creature strains against the walls"),
        }
    }
}
