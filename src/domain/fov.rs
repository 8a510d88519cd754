/// Visibility field: a light/movement mirror of the map plus the last
/// computed field of view.
///
/// The mirror starts as a copy of the map and is then patched incrementally
/// as entities move (`set_tile` on arrival, `clear_tile` on departure).
/// `dirty` is the only trigger for `recompute`.

use super::error::GameError;
use super::map::Map;
use super::shadowcast;
use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FovCell {
    pub transparent: bool,
    pub walkable: bool,
}

impl FovCell {
    pub const OPEN: FovCell = FovCell { transparent: true, walkable: true };
}

#[derive(Clone, Debug)]
pub struct Fov {
    width: usize,
    height: usize,
    cells: Vec<FovCell>,
    visible: Vec<bool>,
    radius: i32,
    pub dirty: bool,
}

impl Fov {
    pub fn new(map: &Map, radius: i32) -> Self {
        let mut fov = Fov {
            width: 0,
            height: 0,
            cells: vec![],
            visible: vec![],
            radius,
            dirty: true,
        };
        fov.set_map(map);
        fov
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rebuild the mirror from every map tile.
    pub fn set_map(&mut self, map: &Map) {
        self.width = map.width;
        self.height = map.height;
        self.cells = vec![FovCell::OPEN; map.width * map.height];
        self.visible = vec![false; map.width * map.height];
        for (x, y, tile) in map.iter() {
            self.cells[y * map.width + x] = FovCell {
                transparent: tile.transparent,
                walkable: tile.walkable,
            };
        }
        self.dirty = true;
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, GameError> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            Err(GameError::OutOfBounds { x, y, width: self.width, height: self.height })
        } else {
            Ok(y as usize * self.width + x as usize)
        }
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<FovCell, GameError> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: &Tile) -> Result<(), GameError> {
        let i = self.index(x, y)?;
        self.cells[i] = FovCell { transparent: tile.transparent, walkable: tile.walkable };
        Ok(())
    }

    /// Mark (x, y) open. Used when an entity vacates a cell; the terrain
    /// below is not consulted, entities only ever stand on walkable floor.
    pub fn clear_tile(&mut self, x: i32, y: i32) -> Result<(), GameError> {
        let i = self.index(x, y)?;
        self.cells[i] = FovCell::OPEN;
        Ok(())
    }

    /// Out-of-bounds cells are never visible.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.visible[i]).unwrap_or(false)
    }

    /// Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.cells[i].walkable).unwrap_or(false)
    }

    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.cells[i].transparent).unwrap_or(false)
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: i32) {
        self.radius = radius;
        self.dirty = true;
    }

    /// Recompute the visible set from `viewer` and clear `dirty`.
    pub fn recompute(&mut self, viewer: (i32, i32)) {
        self.visible.fill(false);
        let (w, h) = (self.width, self.height);
        let cells = &self.cells;
        let visible = &mut self.visible;
        let inside = |x: i32, y: i32| x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h;

        shadowcast::compute(
            viewer,
            self.radius,
            |x, y| !inside(x, y) || !cells[y as usize * w + x as usize].transparent,
            |x, y| {
                if inside(x, y) {
                    visible[y as usize * w + x as usize] = true;
                }
            },
        );
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::Legend;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn fov_of(rows: &[&str], radius: i32) -> (Map, Fov) {
        let map = Map::from_legend(rows, &Legend::standard()).unwrap();
        let fov = Fov::new(&map, radius);
        (map, fov)
    }

    #[test]
    fn mirrors_map_flags() {
        let (_, fov) = fov_of(&["# ", " X"], 5);
        assert!(!fov.is_walkable(0, 0));
        assert!(!fov.is_transparent(0, 0));
        assert!(fov.is_walkable(1, 0));
        assert!(fov.is_transparent(0, 1));
        assert!(!fov.is_walkable(1, 1));
        assert!(fov.dirty);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let (_, mut fov) = fov_of(&["   "], 5);
        assert!(!fov.is_walkable(-1, 0));
        assert!(!fov.is_visible(3, 0));
        assert!(matches!(fov.cell(0, 1), Err(GameError::OutOfBounds { x: 0, y: 1, .. })));
        assert!(fov.clear_tile(5, 5).is_err());
        let (map, _) = fov_of(&[" "], 1);
        assert!(fov.set_tile(-1, 0, map.get(0, 0).unwrap()).is_err());
    }

    #[test]
    fn clear_tile_opens_cell() {
        let (_, mut fov) = fov_of(&["#"], 5);
        fov.clear_tile(0, 0).unwrap();
        assert_eq!(fov.cell(0, 0).unwrap(), FovCell::OPEN);
    }

    #[test]
    fn radius_change_sets_dirty() {
        let (_, mut fov) = fov_of(&["   "], 5);
        fov.recompute((0, 0));
        assert!(!fov.dirty);
        fov.set_radius(3);
        assert!(fov.dirty);
        assert_eq!(fov.radius(), 3);
    }

    #[test]
    fn recompute_respects_walls() {
        let (_, mut fov) = fov_of(&[
            "#######",
            "#  #  #",
            "#######",
        ], 10);
        fov.recompute((1, 1));
        assert!(fov.is_visible(2, 1));
        assert!(fov.is_visible(3, 1));
        assert!(!fov.is_visible(4, 1));
        assert!(!fov.is_visible(5, 1));
        assert!(!fov.dirty);
    }

    #[test]
    fn configured_radius_beyond_the_map_sees_everything() {
        let (_, mut fov) = fov_of(&["    ", "    "], 50_000);
        fov.recompute((0, 0));
        assert!(fov.is_visible(3, 1));
        assert!(fov.is_visible(3, 0));
    }

    /// Random walled arena for the symmetry property.
    #[derive(Clone, Debug)]
    struct Arena {
        width: usize,
        height: usize,
        walls: Vec<bool>,
    }

    impl Arbitrary for Arena {
        fn arbitrary(g: &mut Gen) -> Self {
            let width = 3 + usize::arbitrary(g) % 10;
            let height = 3 + usize::arbitrary(g) % 10;
            let walls = (0..width * height).map(|_| u8::arbitrary(g) % 10 < 3).collect();
            Arena { width, height, walls }
        }
    }

    impl Arena {
        fn rows(&self) -> Vec<String> {
            self.walls
                .chunks(self.width)
                .map(|r| r.iter().map(|&w| if w { '#' } else { ' ' }).collect())
                .collect()
        }
    }

    #[quickcheck]
    fn visibility_is_symmetric(arena: Arena, radius: u8) -> bool {
        let radius = (radius % 8) as i32;
        let map = Map::from_legend(&arena.rows(), &Legend::standard()).unwrap();
        let mut fov = Fov::new(&map, radius);

        let floors: Vec<(i32, i32)> = map
            .iter()
            .filter(|(_, _, t)| t.transparent)
            .map(|(x, y, _)| (x as i32, y as i32))
            .collect();

        let mut sees = std::collections::HashMap::new();
        for &a in &floors {
            fov.recompute(a);
            let set: Vec<bool> = floors.iter().map(|&(x, y)| fov.is_visible(x, y)).collect();
            sees.insert(a, set);
        }
        floors.iter().enumerate().all(|(i, a)| {
            floors.iter().enumerate().all(|(j, b)| sees[a][j] == sees[b][i])
        })
    }
}
