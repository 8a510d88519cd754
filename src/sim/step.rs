/// Turn advance.
///
/// Processing order for one turn (after the frame has been presented):
///   1. Player action (a rejected move does not take the turn)
///   2. Clear entity glyphs from the console
///   3. Every creature runs its tick, newest first
///   4. Birth cells are chosen around each parent's new position, skipping
///      the player and every creature cell, and offspring are inserted at the
///      front (they act from next turn)
///   5. Turn counter advances
///
/// Visibility is not recomputed here: moves only set `fov.dirty`, and the
/// next `Game::draw` does the work.

use crate::domain::ai;
use crate::domain::entity::Action;
use crate::domain::tile::Surface;
use super::event::GameEvent;
use super::world::Game;

/// Apply the player's action. Returns false when the turn was not taken
/// (blocked move); the loop then polls again. `Exit` is handled by the loop.
pub fn player_turn(game: &mut Game, action: Action) -> bool {
    match action {
        Action::Move { dx, dy } => game.player.move_by(dx, dy, &mut game.fov),
        Action::Pass => true,
        Action::Exit => false,
    }
}

pub fn creature_phase(game: &mut Game, surface: &mut impl Surface) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let mut parents = Vec::new();

    game.clear_entities(surface);

    let player = game.player.pos();
    for creature in game.creatures.iter_mut() {
        let out = ai::process(creature, &mut game.fov, player, &game.creature_config, &mut game.rng);
        if let Some(stage) = out.grew {
            let (x, y) = creature.pos();
            events.push(GameEvent::CreatureGrew { x, y, stage });
        }
        if out.reproduce {
            parents.push(creature.pos());
        }
    }

    let mut occupied: Vec<(i32, i32)> = game.creatures.iter().map(|c| c.pos()).collect();
    occupied.push(player);
    for parent in parents {
        let Some((x, y)) = ai::reproduction_site(&game.fov, parent, |p| occupied.contains(&p)) else {
            events.push(GameEvent::SpawnBlocked { x: parent.0, y: parent.1 });
            continue;
        };
        match game.spawn_creature(x, y) {
            Ok(()) => {
                occupied.push((x, y));
                events.push(GameEvent::CreatureReproduced { parent, x, y });
            }
            Err(e) => tracing::warn!("offspring dropped: {e}"),
        }
    }

    game.turn += 1;
    if let Some(last) = events.last() {
        game.last_event = Some(last.clone());
    }
    events
}
