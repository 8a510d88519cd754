/// Error taxonomy for map loading and grid queries.
///
/// An unreachable path is not an error: path queries return an empty path
/// and the creature falls back to wandering.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("malformed map: row {row} has {found} columns, expected {expected}")]
    MalformedMap { row: usize, expected: usize, found: usize },

    #[error("unknown tile kind {glyph:?} at ({x}, {y})")]
    UnknownTileKind { glyph: char, x: usize, y: usize },

    #[error("map has no rows or no walkable cell")]
    EmptyMap,

    #[error("({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: usize, height: usize },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
