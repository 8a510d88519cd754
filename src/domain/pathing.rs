/// Shortest paths over the visibility field's walkability mirror.
///
/// Movement is 8-directional with uniform step cost (Chebyshev metric).
/// The returned path starts at `from` and ends at `to`; an empty path means
/// unreachable.

use pathfinding::prelude::astar;

use super::fov::Fov;

/// Neighbour offsets in expansion order.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (-1, -1), (-1, 1), (1, -1),
];

fn chebyshev(a: (i32, i32), b: (i32, i32)) -> u32 {
    (a.0 - b.0).unsigned_abs().max((a.1 - b.1).unsigned_abs())
}

/// The destination is always enterable so a path can end on an occupied
/// cell; every intermediate cell must be walkable.
pub fn shortest_path(fov: &Fov, from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    if from == to {
        return vec![from];
    }
    let in_bounds = |(x, y): (i32, i32)| {
        x >= 0 && y >= 0 && (x as usize) < fov.width() && (y as usize) < fov.height()
    };
    if !in_bounds(from) || !in_bounds(to) {
        return vec![];
    }

    astar(
        &from,
        |&(x, y)| {
            NEIGHBORS_8
                .iter()
                .map(move |&(dx, dy)| (x + dx, y + dy))
                .filter(|&p| p == to || fov.is_walkable(p.0, p.1))
                .map(|p| (p, 1u32))
                .collect::<Vec<_>>()
        },
        |&p| chebyshev(p, to),
        |&p| p == to,
    )
    .map(|(path, _)| path)
    .unwrap_or_default()
}
