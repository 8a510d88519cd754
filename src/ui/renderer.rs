/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Blit the camera window of the off-screen `Console` into `front`
///   2. Compose the status line under the map
///   3. Compare each cell with `back` buffer (previous frame)
///   4. Only emit terminal commands for cells that changed
///   5. All commands are batched with `queue!`, flushed once at the end
///   6. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Rgb;
use crate::sim::world::Game;
use super::console::{Console, ConsoleCell};

/// Background painted under everything before the first frame.
const BASE_BG: Rgb = Console::BLANK.bg;

/// Sentinel cell used to invalidate the back frame.
/// Different from any real cell, so every position will be diff'd.
const INVALID: ConsoleCell = ConsoleCell {
    glyph: '?',
    fg: Rgb::new(255, 0, 255),
    bg: Rgb::new(255, 0, 255),
};

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Renderer ──

/// Rows reserved under the map for the status line.
const STATUS_ROWS: usize = 1;

const STATUS_FG: Rgb = Rgb::new(200, 200, 200);
const STATUS_BG: Rgb = Rgb::new(20, 20, 60);

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: Console,
    back: Console,
    term_w: usize,
    term_h: usize,
    /// Window size requested on the command line; terminal size otherwise.
    requested: (Option<u16>, Option<u16>),
}

impl Renderer {
    pub fn new(width: Option<u16>, height: Option<u16>) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: Console::new(0, 0),
            back: Console::new(0, 0),
            term_w: 0,
            term_h: 0,
            requested: (width, height),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(color(BASE_BG)),
            Clear(ClearType::All)
        )?;

        let (tw, th) = self.window_size();
        self.resize(tw, th);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Show the camera window of `console` plus the status line.
    pub fn present(&mut self, game: &mut Game, console: &Console) -> io::Result<()> {
        let (tw, th) = self.window_size();
        if tw != self.term_w || th != self.term_h {
            self.resize(tw, th);
            queue!(self.writer, SetBackgroundColor(color(BASE_BG)), Clear(ClearType::All))?;
        }

        self.compose(game, console);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn window_size(&self) -> (usize, usize) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let w = self.requested.0.map_or(tw, |w| w.min(tw));
        let h = self.requested.1.map_or(th, |h| h.min(th));
        (w as usize, h as usize)
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        if self.front.width() != w || self.front.height() != h {
            self.front = Console::new(w, h);
            self.back = Console::new(w, h);
        }
        // Force full repaint: back ≠ front for every cell.
        self.back.fill(INVALID);
    }

    /// Build the front buffer. The viewport is capped to the map so small
    /// maps don't waste space on void.
    fn compose(&mut self, game: &mut Game, console: &Console) {
        let cam = &mut game.camera;
        cam.view_w = self.term_w.min(console.width());
        cam.view_h = self.term_h.saturating_sub(STATUS_ROWS).max(1).min(console.height());
        let (px, py) = game.player.pos();
        cam.follow(px, py, console.width(), console.height());

        self.front.fill(Console::BLANK);
        for sy in 0..cam.view_h {
            for sx in 0..cam.view_w {
                let wx = cam.x as usize + sx;
                let wy = cam.y as usize + sy;
                self.front.set(sx, sy, console.get(wx, wy));
            }
        }

        let row = cam.view_h;
        self.front.put_str(0, row, &" ".repeat(self.term_w), STATUS_FG, STATUS_BG);
        let mut status = format!(" Turn {}   Creatures {}", game.turn, game.creatures.len());
        if let Some(event) = &game.last_event {
            status.push_str(&format!("   {event}"));
        }
        self.front.put_str(0, row, &status, STATUS_FG, STATUS_BG);
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Rgb::WHITE;
        let mut last_bg = BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors at start of frame, never ResetColor.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(color(BASE_BG)),
        )?;

        for y in 0..self.front.height() {
            for x in 0..self.front.width() {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(color(cell.fg)))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(color(cell.bg)))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.glyph))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CreatureConfig;
    use crate::domain::map::{Legend, Map};
    use crate::sim::event::GameEvent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn renderer(w: usize, h: usize) -> Renderer {
        let mut r = Renderer::new(None, None);
        r.resize(w, h);
        r
    }

    fn game(width: usize, height: usize) -> (Game, Console) {
        let rows = vec![" ".repeat(width); height];
        let map = Map::from_legend(&rows, &Legend::standard()).unwrap();
        let cfg = CreatureConfig { initial_spawn_attempts: 0, ..CreatureConfig::default() };
        let game = Game::new(map, 0, cfg, StdRng::seed_from_u64(5)).unwrap();
        (game, Console::new(width, height))
    }

    fn row_text(frame: &Console, y: usize) -> String {
        (0..frame.width()).map(|x| frame.get(x, y).glyph).collect()
    }

    #[test]
    fn small_map_is_drawn_at_origin_with_status_below() {
        let (mut g, mut console) = game(5, 3);
        g.draw(&mut console);
        let mut r = renderer(30, 10);
        r.compose(&mut g, &console);

        assert_eq!((g.camera.view_w, g.camera.view_h), (5, 3));
        assert_eq!(r.front.get(2, 1).glyph, '@');
        assert_eq!(r.front.get(2, 1).fg, Rgb::GREEN);
        assert!(row_text(&r.front, 3).starts_with(" Turn 0   Creatures 0"));
    }

    #[test]
    fn camera_window_follows_player() {
        let (mut g, mut console) = game(40, 3);
        g.draw(&mut console);
        let mut r = renderer(10, 4);
        r.compose(&mut g, &console);

        // Player at (20, 1): window starts at 20 - 10/2.
        assert_eq!(g.camera.x, 15);
        assert_eq!(r.front.get(5, 1).glyph, '@');
    }

    #[test]
    fn status_line_shows_latest_event() {
        let (mut g, mut console) = game(5, 1);
        g.last_event = Some(GameEvent::CreatureSpawned { x: 1, y: 0 });
        g.draw(&mut console);
        let mut r = renderer(60, 3);
        r.compose(&mut g, &console);
        assert!(row_text(&r.front, 1).contains("A creature appears at 1,0"));
    }

    #[test]
    fn status_line_is_clipped_to_a_narrow_window() {
        let (mut g, mut console) = game(5, 1);
        g.draw(&mut console);
        let mut r = renderer(8, 3);
        r.compose(&mut g, &console);
        assert_eq!(row_text(&r.front, 1), " Turn 0 ");
        assert_eq!(r.front.get(7, 1).bg, STATUS_BG);
    }

    #[test]
    fn resize_invalidates_the_back_frame() {
        let r = renderer(4, 2);
        assert_eq!(r.back.get(3, 1), INVALID);
        assert_eq!(r.front.get(3, 1), Console::BLANK);
    }
}
