/// Tile visuals and traversal flags.
///
/// A `Tile` is the rendering contract shared by map cells and entities:
/// glyph, full colors, derived fog colors, light/movement flags and the
/// `explored` memory bit. Fog colors are derived once at construction and
/// never written afterwards.

use serde::Deserialize;

/// Brightness of remembered-but-not-visible cells.
pub const FOG_BRIGHTNESS: f32 = 0.3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const DARK_GRAY: Rgb = Rgb::new(95, 95, 95);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Multiply every channel by `factor`, truncating and clamping to 0..=255.
    pub fn scale(self, factor: f32) -> Rgb {
        let ch = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Linear interpolation from `from` (t = 0) to `to` (t = 1).
    pub fn lerp(from: Rgb, to: Rgb, t: f32) -> Rgb {
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).clamp(0.0, 255.0) as u8;
        Rgb::new(ch(from.r, to.r), ch(from.g, to.g), ch(from.b, to.b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::new(r, g, b)
    }
}

/// Draw-a-cell capability of the display backend.
pub trait Surface {
    fn put_char(&mut self, x: usize, y: usize, glyph: char, fg: Rgb, bg: Rgb);

    /// Reset the cell to the surface's default blank.
    fn put_blank(&mut self, x: usize, y: usize);
}

/// One legend entry: everything needed to build a tile.
#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
pub struct TileSpec {
    pub glyph: char,
    pub color: Rgb,
    pub background: Rgb,
    pub transparent: bool,
    pub walkable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub glyph: char,
    pub color: Rgb,
    pub background: Rgb,
    fog_color: Rgb,
    fog_background: Rgb,
    pub transparent: bool,
    pub walkable: bool,
    pub explored: bool,
}

impl Tile {
    pub fn new(spec: &TileSpec) -> Self {
        Self::with_fog_brightness(spec, FOG_BRIGHTNESS)
    }

    pub fn with_fog_brightness(spec: &TileSpec, brightness: f32) -> Self {
        Tile {
            glyph: spec.glyph,
            color: spec.color,
            background: spec.background,
            fog_color: spec.color.scale(brightness),
            fog_background: spec.background.scale(brightness),
            transparent: spec.transparent,
            walkable: spec.walkable,
            explored: false,
        }
    }

    pub fn fog_color(&self) -> Rgb {
        self.fog_color
    }

    pub fn fog_background(&self) -> Rgb {
        self.fog_background
    }

    /// Visible cells are drawn in full color and remembered; explored cells
    /// are drawn fogged; never-seen cells are blank.
    pub fn draw_at(&mut self, surface: &mut impl Surface, x: usize, y: usize, visible: bool) {
        if visible {
            self.explored = true;
            surface.put_char(x, y, self.glyph, self.color, self.background);
        } else if self.explored {
            surface.put_char(x, y, self.glyph, self.fog_color, self.fog_background);
        } else {
            surface.put_blank(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        cells: Vec<(usize, usize, char, Rgb, Rgb)>,
        blanks: Vec<(usize, usize)>,
    }

    impl Surface for Recorder {
        fn put_char(&mut self, x: usize, y: usize, glyph: char, fg: Rgb, bg: Rgb) {
            self.cells.push((x, y, glyph, fg, bg));
        }
        fn put_blank(&mut self, x: usize, y: usize) {
            self.blanks.push((x, y));
        }
    }

    fn wall() -> TileSpec {
        TileSpec {
            glyph: '#',
            color: Rgb::new(80, 80, 80),
            background: Rgb::new(40, 40, 40),
            transparent: false,
            walkable: false,
        }
    }

    #[test]
    fn fog_colors_are_thirty_percent() {
        let t = Tile::new(&wall());
        assert_eq!(t.fog_color(), Rgb::new(24, 24, 24));
        assert_eq!(t.fog_background(), Rgb::new(12, 12, 12));
    }

    #[test]
    fn unexplored_hidden_cell_is_blank() {
        let mut t = Tile::new(&wall());
        let mut s = Recorder::default();
        t.draw_at(&mut s, 3, 4, false);
        assert_eq!(s.blanks, vec![(3, 4)]);
        assert!(s.cells.is_empty());
        assert!(!t.explored);
    }

    #[test]
    fn visible_draw_marks_explored_then_fogs() {
        let mut t = Tile::new(&wall());
        let mut s = Recorder::default();
        t.draw_at(&mut s, 1, 1, true);
        assert!(t.explored);
        assert_eq!(s.cells[0], (1, 1, '#', Rgb::new(80, 80, 80), Rgb::new(40, 40, 40)));

        t.draw_at(&mut s, 1, 1, false);
        assert!(t.explored);
        assert_eq!(s.cells[1], (1, 1, '#', Rgb::new(24, 24, 24), Rgb::new(12, 12, 12)));
        assert!(s.blanks.is_empty());
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(Rgb::lerp(Rgb::DARK_GRAY, Rgb::RED, 0.0), Rgb::DARK_GRAY);
        assert_eq!(Rgb::lerp(Rgb::BLACK, Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(Rgb::lerp(Rgb::BLACK, Rgb::new(200, 100, 0), 0.5), Rgb::new(100, 50, 0));
    }
}
