/// Tile grid loaded from ASCII rows through an explicit legend.
///
/// ## Built-in legend:
///   '#' = wall (opaque, blocked)      ' ' = floor
///   'X' = mossy wall, drawn as '#'
///
/// Rows must all have the same length. The check runs over the whole input
/// before any tile is constructed.

use std::collections::HashMap;
use std::path::Path;

use super::error::GameError;
use super::fov::Fov;
use super::tile::{Surface, Tile, TileSpec, Rgb, FOG_BRIGHTNESS};

const STONE_BG: Rgb = Rgb::new(40, 40, 40);

/// Glyph-to-tile configuration consumed by the loader.
#[derive(Clone, Debug)]
pub struct Legend {
    entries: HashMap<char, TileSpec>,
    pub fog_brightness: f32,
}

impl Legend {
    pub fn new(entries: HashMap<char, TileSpec>) -> Self {
        Legend { entries, fog_brightness: FOG_BRIGHTNESS }
    }

    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        entries.insert('#', TileSpec {
            glyph: '#',
            color: Rgb::new(80, 80, 80),
            background: STONE_BG,
            transparent: false,
            walkable: false,
        });
        entries.insert(' ', TileSpec {
            glyph: ' ',
            color: Rgb::WHITE,
            background: STONE_BG,
            transparent: true,
            walkable: true,
        });
        entries.insert('X', TileSpec {
            glyph: '#',
            color: Rgb::new(114, 255, 114),
            background: STONE_BG,
            transparent: false,
            walkable: false,
        });
        Legend::new(entries)
    }

    pub fn get(&self, key: char) -> Option<&TileSpec> {
        self.entries.get(&key)
    }
}

impl Default for Legend {
    fn default() -> Self {
        Legend::standard()
    }
}

#[derive(Clone, Debug)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Tile>,
}

impl Map {
    pub fn from_legend<S: AsRef<str>>(rows: &[S], legend: &Legend) -> Result<Map, GameError> {
        let first = rows.first().ok_or(GameError::EmptyMap)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GameError::EmptyMap);
        }
        for (row, line) in rows.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != width {
                return Err(GameError::MalformedMap { row, expected: width, found });
            }
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, line) in rows.iter().enumerate() {
            for (x, glyph) in line.as_ref().chars().enumerate() {
                let spec = legend.get(glyph).ok_or(GameError::UnknownTileKind { glyph, x, y })?;
                tiles.push(Tile::with_fog_brightness(spec, legend.fog_brightness));
            }
        }

        Ok(Map { width, height: rows.len(), tiles })
    }

    /// Read a map file: one row per line. Only line terminators are stripped;
    /// spaces are floor and stay significant. Trailing blank lines are ignored.
    pub fn load(path: &Path, legend: &Legend) -> Result<Map, GameError> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut rows: Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let map = Map::from_legend(&rows, legend)?;
        tracing::info!(path = %path.display(), width = map.width, height = map.height, "map loaded");
        Ok(map)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(move |i| &mut self.tiles[i])
    }

    /// Row-major `(x, y, tile)` iteration.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> + '_ {
        let w = self.width;
        self.tiles.iter().enumerate().map(move |(i, t)| (i % w, i / w, t))
    }

    pub fn draw(&mut self, fov: &Fov, surface: &mut impl Surface) {
        let w = self.width;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            let (x, y) = (i % w, i / w);
            tile.draw_at(surface, x, y, fov.is_visible(x as i32, y as i32));
        }
    }

    /// Redraw the single map cell at (x, y), e.g. under a departing entity.
    pub fn draw_cell(&mut self, fov: &Fov, surface: &mut impl Surface, x: i32, y: i32) {
        let visible = fov.is_visible(x, y);
        if let Some(tile) = self.get_mut(x, y) {
            tile.draw_at(surface, x as usize, y as usize, visible);
        }
    }
}
