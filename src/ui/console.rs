/// Off-screen console: a grid of glyph cells. The game draws the map into a
/// map-sized one; the renderer keeps two window-sized ones as its front and
/// back frames and blits a camera window of the map console into the front.

use crate::domain::tile::{Rgb, Surface};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ConsoleCell {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

pub struct Console {
    width: usize,
    height: usize,
    cells: Vec<ConsoleCell>,
}

impl Console {
    pub const BLANK: ConsoleCell = ConsoleCell { glyph: ' ', fg: Rgb::WHITE, bg: Rgb::BLACK };

    pub fn new(width: usize, height: usize) -> Self {
        Console { width, height, cells: vec![Self::BLANK; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range reads return a blank cell.
    pub fn get(&self, x: usize, y: usize) -> ConsoleCell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Self::BLANK
        }
    }

    pub fn set(&mut self, x: usize, y: usize, cell: ConsoleCell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn fill(&mut self, cell: ConsoleCell) {
        self.cells.fill(cell);
    }

    /// One column per char, clipped at the right edge.
    pub fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Rgb, bg: Rgb) {
        for (cx, glyph) in (x..self.width).zip(s.chars()) {
            self.set(cx, y, ConsoleCell { glyph, fg, bg });
        }
    }
}

impl Surface for Console {
    fn put_char(&mut self, x: usize, y: usize, glyph: char, fg: Rgb, bg: Rgb) {
        self.set(x, y, ConsoleCell { glyph, fg, bg });
    }

    fn put_blank(&mut self, x: usize, y: usize) {
        self.set(x, y, Self::BLANK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_outside_are_ignored() {
        let mut c = Console::new(2, 2);
        c.put_char(5, 5, 'x', Rgb::RED, Rgb::BLACK);
        assert!((0..2).all(|y| (0..2).all(|x| c.get(x, y) == Console::BLANK)));
        assert_eq!(c.get(9, 9), Console::BLANK);
    }

    #[test]
    fn put_then_blank() {
        let mut c = Console::new(3, 1);
        c.put_char(1, 0, '@', Rgb::GREEN, Rgb::BLACK);
        assert_eq!(c.get(1, 0).glyph, '@');
        c.put_blank(1, 0);
        assert_eq!(c.get(1, 0), Console::BLANK);
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut c = Console::new(4, 2);
        c.put_str(1, 1, "turn", Rgb::WHITE, Rgb::BLACK);
        let row: String = (0..4).map(|x| c.get(x, 1).glyph).collect();
        assert_eq!(row, " tur");
        c.fill(Console::BLANK);
        assert_eq!(c.get(1, 1), Console::BLANK);
    }
}
