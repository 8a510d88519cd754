/// Entities: the player and the creatures.
///
/// An entity owns its `visual` tile (glyph, colors, light/movement flags)
/// rather than being one. Creature-only state lives in `Creature`.

use super::error::GameError;
use super::fov::Fov;
use super::map::Map;
use super::tile::{Rgb, Surface, Tile, TileSpec};

const FLOOR_BG: Rgb = Rgb::new(40, 40, 40);

/// Points a creature must bank to take one step.
pub const STEP_COST: u32 = 100;

/// Growth stage: each stage has its own glyph and speed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    Spawn,
    Grown,
    Elder,
}

/// What the player does with one turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move { dx: i32, dy: i32 },
    Pass,
    Exit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    /// Points gained per tick, in hundredths of a step.
    pub movement: u32,
    pub points: u32,
    /// Ticks spent visible to the player. Never decreases.
    pub seen: u32,
    pub stage: Stage,
    pub orig_color: Rgb,
}

impl Creature {
    pub fn new(movement: u32, orig_color: Rgb) -> Self {
        Creature { movement, points: 0, seen: 0, stage: Stage::Spawn, orig_color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player,
    Creature(Creature),
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub x: i32,
    pub y: i32,
    pub visual: Tile,
    pub kind: EntityKind,
}

impl Entity {
    pub fn player(x: i32, y: i32) -> Self {
        Entity {
            x, y,
            visual: Tile::new(&TileSpec {
                glyph: '@',
                color: Rgb::GREEN,
                background: FLOOR_BG,
                transparent: true,
                walkable: true,
            }),
            kind: EntityKind::Player,
        }
    }

    /// Creatures block movement (not light) wherever they step.
    pub fn creature(x: i32, y: i32, glyph: char, color: Rgb, movement: u32) -> Self {
        Entity {
            x, y,
            visual: Tile::new(&TileSpec {
                glyph,
                color,
                background: FLOOR_BG,
                transparent: true,
                walkable: false,
            }),
            kind: EntityKind::Creature(Creature::new(movement, color)),
        }
    }

    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn creature_state(&self) -> Option<&Creature> {
        match &self.kind {
            EntityKind::Creature(c) => Some(c),
            EntityKind::Player => None,
        }
    }

    /// Entities are never remembered and only drawn while visible. A hidden
    /// entity leaves the cell to the map, so fogged floor keeps its colours.
    pub fn draw(&mut self, fov: &Fov, surface: &mut impl Surface) {
        self.visual.explored = false;
        if !fov.is_visible(self.x, self.y) {
            return;
        }
        if let (Ok(x), Ok(y)) = (usize::try_from(self.x), usize::try_from(self.y)) {
            self.visual.draw_at(surface, x, y, true);
        }
    }

    /// Erase this entity's glyph by redrawing the map cell beneath it.
    pub fn clear(&self, map: &mut Map, fov: &Fov, surface: &mut impl Surface) {
        map.draw_cell(fov, surface, self.x, self.y);
    }

    /// Step by (dx, dy). Rejected (false, nothing changed) when the target
    /// is not walkable. Dirties the field when the mover was or becomes visible.
    pub fn move_by(&mut self, dx: i32, dy: i32, fov: &mut Fov) -> bool {
        let (nx, ny) = (self.x + dx, self.y + dy);
        if !fov.is_walkable(nx, ny) {
            return false;
        }
        let was_visible = fov.is_visible(self.x, self.y);
        if let Err(e) = self.relocate(nx, ny, fov) {
            tracing::warn!("move rejected: {e}");
            return false;
        }
        let is_visible = fov.is_visible(self.x, self.y);
        if was_visible || is_visible {
            fov.dirty = true;
        }
        true
    }

    fn relocate(&mut self, nx: i32, ny: i32, fov: &mut Fov) -> Result<(), GameError> {
        fov.clear_tile(self.x, self.y)?;
        self.x = nx;
        self.y = ny;
        fov.set_tile(nx, ny, &self.visual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fov::FovCell;
    use crate::domain::map::Legend;
    use crate::ui::console::Console;

    fn world(rows: &[&str]) -> (Map, Fov) {
        let map = Map::from_legend(rows, &Legend::standard()).unwrap();
        let fov = Fov::new(&map, 10);
        (map, fov)
    }

    #[test]
    fn move_into_wall_is_rejected_without_side_effects() {
        let (_, mut fov) = world(&["# ", "  "]);
        fov.recompute((1, 1));
        let before = fov.clone();
        let mut p = Entity::player(1, 1);
        assert!(!p.move_by(-1, -1, &mut fov));
        assert_eq!(p.pos(), (1, 1));
        assert_eq!(fov.cell(0, 0).unwrap(), before.cell(0, 0).unwrap());
        assert_eq!(fov.cell(1, 1).unwrap(), before.cell(1, 1).unwrap());
        assert!(!fov.dirty);
    }

    #[test]
    fn move_off_grid_is_rejected() {
        let (_, mut fov) = world(&["  "]);
        let mut p = Entity::player(0, 0);
        assert!(!p.move_by(-1, 0, &mut fov));
        assert!(!p.move_by(0, 1, &mut fov));
        assert_eq!(p.pos(), (0, 0));
    }

    #[test]
    fn creature_move_blocks_new_cell_and_opens_old() {
        let (_, mut fov) = world(&["   "]);
        let mut c = Entity::creature(0, 0, '.', Rgb::RED, 20);
        assert!(c.move_by(1, 0, &mut fov));
        assert_eq!(c.pos(), (1, 0));
        assert_eq!(fov.cell(0, 0).unwrap(), FovCell::OPEN);
        assert!(!fov.is_walkable(1, 0));
        assert!(fov.is_transparent(1, 0));
    }

    #[test]
    fn dirty_only_when_mover_was_or_becomes_visible() {
        let (_, mut fov) = world(&[
            "   #   ",
            "   #   ",
        ]);
        fov.recompute((0, 0));
        let mut hidden = Entity::creature(5, 0, '.', Rgb::RED, 20);
        assert!(hidden.move_by(1, 1, &mut fov));
        assert!(!fov.dirty);

        let mut seen = Entity::creature(1, 1, '.', Rgb::RED, 20);
        assert!(seen.move_by(1, 0, &mut fov));
        assert!(fov.dirty);
    }

    #[test]
    fn hidden_entity_leaves_fogged_floor_untouched() {
        let (mut map, mut fov) = world(&["   "]);
        let mut console = Console::new(3, 1);
        let mut c = Entity::creature(2, 0, '.', Rgb::RED, 20);
        fov.recompute((0, 0));
        map.draw(&fov, &mut console);
        c.draw(&fov, &mut console);
        assert_eq!(console.get(2, 0).glyph, '.');

        fov.set_radius(1);
        fov.recompute((0, 0));
        map.draw(&fov, &mut console);
        let fogged = console.get(2, 0);
        let floor = map.get(2, 0).unwrap();
        assert_eq!(fogged.glyph, ' ');
        assert_eq!(fogged.bg, floor.fog_background());

        c.draw(&fov, &mut console);
        assert_eq!(console.get(2, 0), fogged);
        assert!(!c.visual.explored);
    }

    #[test]
    fn hidden_entity_on_unseen_cell_draws_nothing() {
        let (_, mut fov) = world(&["  #  "]);
        let mut console = Console::new(5, 1);
        let mut c = Entity::creature(4, 0, '.', Rgb::RED, 20);
        fov.recompute((0, 0));
        c.draw(&fov, &mut console);
        assert_eq!(console.get(4, 0), Console::BLANK);
    }
}
