/// Creature AI: one decision per tick.
///
/// While visible to the player a creature:
///   1. counts the tick in `seen` and brightens toward its original color,
///   2. reproduces every `reproduce_every` visible ticks,
///   3. grows at `grow_at` / `elder_at` (new glyph, faster),
///   4. chases along the shortest path when it is more than one step away.
///
/// Otherwise (hidden, adjacent, or no route) it wanders randomly.
/// Movement is paid from a points bank: `movement` per tick, `STEP_COST`
/// per step.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::CreatureConfig;
use super::entity::{Creature, Entity, EntityKind, Stage, STEP_COST};
use super::fov::Fov;
use super::pathing::{shortest_path, NEIGHBORS_8};
use super::tile::Rgb;

/// Random walk offsets; includes standing still.
const WANDER: [(i32, i32); 9] = [
    (0, 0),
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (-1, -1), (-1, 1), (1, -1),
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutcome {
    /// The creature changed cell this tick.
    pub moved: bool,
    /// This tick triggered reproduction. The birth cell is chosen once the
    /// whole pass has moved, from the parent's new position.
    pub reproduce: bool,
    pub grew: Option<Stage>,
}

/// Run one tick for `entity`. The player's tick is a no-op.
pub fn process(
    entity: &mut Entity,
    fov: &mut Fov,
    player: (i32, i32),
    cfg: &CreatureConfig,
    rng: &mut impl Rng,
) -> TickOutcome {
    let mut out = TickOutcome::default();
    let (x, y) = entity.pos();
    let visible = fov.is_visible(x, y);
    let EntityKind::Creature(c) = &mut entity.kind else { return out; };

    if visible {
        c.seen += 1;
        let phase = c.seen % cfg.reproduce_every;
        entity.visual.color = Rgb::lerp(Rgb::DARK_GRAY, c.orig_color, phase as f32 / 100.0);

        out.reproduce = phase == 0;

        if c.seen == cfg.grow_at {
            c.stage = Stage::Grown;
            c.movement = cfg.grown_speed;
            entity.visual.glyph = cfg.grown_glyph;
            out.grew = Some(Stage::Grown);
        } else if c.seen == cfg.elder_at {
            c.stage = Stage::Elder;
            c.movement = cfg.elder_speed;
            entity.visual.glyph = cfg.elder_glyph;
            out.grew = Some(Stage::Elder);
        }
    }

    let path = if visible { shortest_path(fov, (x, y), player) } else { vec![] };
    let step = if path.len() > 2 {
        bank(c).then(|| (path[1].0 - x, path[1].1 - y))
    } else {
        bank(c).then(|| *WANDER.choose(rng).unwrap_or(&(0, 0)))
    };

    if let Some((dx, dy)) = step {
        out.moved = entity.move_by(dx, dy, fov) && (dx, dy) != (0, 0);
        tracing::trace!(x, y, dx, dy, moved = out.moved, chase = path.len() > 2, "creature step");
    }
    out
}

/// Add this tick's movement; pay for a step if the bank allows.
fn bank(c: &mut Creature) -> bool {
    c.points += c.movement;
    if c.points >= STEP_COST {
        c.points -= STEP_COST;
        true
    } else {
        false
    }
}

/// First walkable neighbour in fixed order that `occupied` does not claim.
/// Callers pass the player's cell and every creature cell as occupied.
pub fn reproduction_site(
    fov: &Fov,
    at: (i32, i32),
    occupied: impl Fn((i32, i32)) -> bool,
) -> Option<(i32, i32)> {
    NEIGHBORS_8
        .iter()
        .map(|&(dx, dy)| (at.0 + dx, at.1 + dy))
        .find(|&p| fov.is_walkable(p.0, p.1) && !occupied(p))
}
