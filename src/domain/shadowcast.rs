/// Symmetric shadowcasting.
///
/// Each of the four quadrants is scanned row by row outward from the origin.
/// A row is a span of columns bounded by two slopes; walls narrow the span
/// or split it into a child row. Floor tiles are only revealed when their
/// centre lies inside the span, which makes the result symmetric: if A sees
/// B then B sees A (both floor, same radius).
///
/// Slopes are exact fractions so the symmetry does not depend on float
/// rounding.

#[derive(Clone, Copy, Debug)]
enum Quadrant {
    North,
    East,
    South,
    West,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [Quadrant::North, Quadrant::East, Quadrant::South, Quadrant::West];

    fn transform(self, origin: (i32, i32), depth: i32, col: i32) -> (i32, i32) {
        let (ox, oy) = origin;
        match self {
            Quadrant::North => (ox + col, oy - depth),
            Quadrant::South => (ox + col, oy + depth),
            Quadrant::East => (ox + depth, oy + col),
            Quadrant::West => (ox - depth, oy + col),
        }
    }
}

/// `num / den` with `den > 0`.
#[derive(Clone, Copy, Debug)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    /// Slope through the near edge of the tile at (depth, col).
    fn of_tile(depth: i32, col: i32) -> Slope {
        Slope { num: 2 * col - 1, den: 2 * depth }
    }

    /// floor(depth * slope + 1/2)
    fn round_ties_up(self, depth: i32) -> i32 {
        (2 * depth * self.num + self.den).div_euclid(2 * self.den)
    }

    /// ceil(depth * slope - 1/2)
    fn round_ties_down(self, depth: i32) -> i32 {
        -(self.den - 2 * depth * self.num).div_euclid(2 * self.den)
    }
}

#[derive(Clone, Copy, Debug)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    fn next(self) -> Row {
        Row { depth: self.depth + 1, ..self }
    }

    fn is_symmetric(&self, col: i32) -> bool {
        col * self.start.den >= self.depth * self.start.num
            && col * self.end.den <= self.depth * self.end.num
    }
}

/// Compute the cells visible from `origin`.
///
/// `radius <= 0` means unlimited. Out-of-bounds cells must report as
/// blocking so the scan terminates at the grid edge. `reveal` may receive
/// the same cell more than once.
pub fn compute(
    origin: (i32, i32),
    radius: i32,
    is_blocking: impl Fn(i32, i32) -> bool,
    mut reveal: impl FnMut(i32, i32),
) {
    // i64 so any configured radius squares without overflow.
    let r2 = i64::from(radius).pow(2);
    let mut mark = |x: i32, y: i32| {
        let (dx, dy) = (i64::from(x - origin.0), i64::from(y - origin.1));
        if radius <= 0 || dx * dx + dy * dy <= r2 {
            reveal(x, y);
        }
    };

    mark(origin.0, origin.1);

    for quadrant in Quadrant::ALL {
        let mut rows = vec![Row {
            depth: 1,
            start: Slope { num: -1, den: 1 },
            end: Slope { num: 1, den: 1 },
        }];

        while let Some(mut row) = rows.pop() {
            if radius > 0 && row.depth > radius {
                continue;
            }
            let min_col = row.start.round_ties_up(row.depth);
            let max_col = row.end.round_ties_down(row.depth);

            // Some(true) = previous tile was a wall, Some(false) = floor.
            let mut prev_wall: Option<bool> = None;
            for col in min_col..=max_col {
                let (x, y) = quadrant.transform(origin, row.depth, col);
                let wall = is_blocking(x, y);
                if wall || row.is_symmetric(col) {
                    mark(x, y);
                }
                if prev_wall == Some(true) && !wall {
                    row.start = Slope::of_tile(row.depth, col);
                }
                if prev_wall == Some(false) && wall {
                    let mut child = row.next();
                    child.end = Slope::of_tile(row.depth, col);
                    rows.push(child);
                }
                prev_wall = Some(wall);
            }
            if prev_wall == Some(false) {
                rows.push(row.next());
            }
        }
    }
}
