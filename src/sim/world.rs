/// Game: the complete state of a running session.
///
/// ## Ownership
///
/// The session exclusively owns the map, the visibility field and every
/// entity. Nothing holds a reference back to it: behaviour code receives the
/// field and the player's position as parameters.
///
/// ## Entity order
///
/// `creatures` is newest-first. Offspring born during a turn are inserted at
/// the front after the creature pass, so they first act on the next turn.
/// The player is kept separately and drawn last (on top).
///
/// ## Camera / Viewport
///
/// World coordinates and screen coordinates are separate:
///   - `camera`: viewport into the world (top-left corner + size)
///   - Renderer maps: `screen(sx, sy) = world(camera.x + sx, camera.y + sy)`

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::CreatureConfig;
use crate::domain::entity::Entity;
use crate::domain::error::GameError;
use crate::domain::fov::Fov;
use crate::domain::map::Map;
use crate::domain::tile::Surface;
use super::event::GameEvent;

/// Camera: a viewport into the world.
///
/// `(x, y)` is the world coordinate of the top-left visible cell.
/// `(view_w, view_h)` is how many world cells fit in the viewport,
/// set by the renderer from the terminal size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

impl Camera {
    /// Centre on the target, then clamp so the view never runs past the
    /// far edge nor before the origin. Maps smaller than the view sit at 0.
    pub fn follow(&mut self, target_x: i32, target_y: i32, world_w: usize, world_h: usize) {
        self.x = clamp_axis(target_x, self.view_w, world_w);
        self.y = clamp_axis(target_y, self.view_h, world_h);
    }
}

fn clamp_axis(target: i32, view: usize, world: usize) -> i32 {
    let (view, world) = (view as i32, world as i32);
    let mut start = target - view / 2;
    if start + view > world {
        start = world - view;
    }
    start.max(0)
}

pub struct Game {
    pub map: Map,
    pub fov: Fov,
    pub player: Entity,
    /// Newest first.
    pub creatures: VecDeque<Entity>,
    pub creature_config: CreatureConfig,
    pub rng: StdRng,
    pub turn: u64,
    pub camera: Camera,
    /// Latest event, shown on the status line.
    pub last_event: Option<GameEvent>,
}

// ── Construction ──

impl Game {
    /// Place the player, then sample `initial_spawn_attempts` random cells
    /// and put a creature on each walkable one the player does not occupy.
    pub fn new(
        map: Map,
        fov_radius: i32,
        creature_config: CreatureConfig,
        rng: StdRng,
    ) -> Result<Game, GameError> {
        let (px, py) = player_start(&map)?;
        let fov = Fov::new(&map, fov_radius);
        let mut game = Game {
            map,
            fov,
            player: Entity::player(px, py),
            creatures: VecDeque::new(),
            creature_config,
            rng,
            turn: 0,
            camera: Camera::default(),
            last_event: None,
        };

        let (w, h) = (game.map.width as i32, game.map.height as i32);
        for _ in 0..game.creature_config.initial_spawn_attempts {
            let x = game.rng.gen_range(0..w);
            let y = game.rng.gen_range(0..h);
            if (x, y) != (px, py) && game.fov.is_walkable(x, y) {
                game.spawn_creature(x, y)?;
                tracing::info!(x, y, "creature spawned");
                game.last_event = Some(GameEvent::CreatureSpawned { x, y });
            }
        }
        tracing::info!(
            player_x = px, player_y = py,
            creatures = game.creatures.len(),
            "session ready"
        );
        Ok(game)
    }

    /// Put a fresh spawn-stage creature at the front of the list.
    /// The cell is not registered in the field until the creature moves.
    pub fn spawn_creature(&mut self, x: i32, y: i32) -> Result<(), GameError> {
        if !self.map.contains(x, y) {
            return Err(GameError::OutOfBounds {
                x, y,
                width: self.map.width,
                height: self.map.height,
            });
        }
        let cfg = &self.creature_config;
        self.creatures.push_front(Entity::creature(x, y, cfg.glyph, cfg.color, cfg.base_speed));
        Ok(())
    }
}

// ── Drawing ──

impl Game {
    /// Recompute and redraw the map only when the visible set may have
    /// changed, then draw every entity on top.
    pub fn draw(&mut self, surface: &mut impl Surface) {
        if self.fov.dirty {
            self.fov.recompute(self.player.pos());
            self.map.draw(&self.fov, surface);
        }
        for creature in self.creatures.iter_mut() {
            creature.draw(&self.fov, surface);
        }
        self.player.draw(&self.fov, surface);
    }

    /// Erase every entity glyph by redrawing the map cell beneath it.
    pub fn clear_entities(&mut self, surface: &mut impl Surface) {
        for creature in &self.creatures {
            creature.clear(&mut self.map, &self.fov, surface);
        }
        self.player.clear(&mut self.map, &self.fov, surface);
    }
}

/// Map centre, or the nearest walkable cell by expanding Chebyshev rings
/// (row-major within a ring).
pub fn player_start(map: &Map) -> Result<(i32, i32), GameError> {
    let (cx, cy) = (map.width as i32 / 2, map.height as i32 / 2);
    let walkable = |x: i32, y: i32| map.get(x, y).is_some_and(|t| t.walkable);
    let reach = map.width.max(map.height) as i32;

    for r in 0..=reach {
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                let on_ring = (x - cx).abs() == r || (y - cy).abs() == r;
                if on_ring && walkable(x, y) {
                    return Ok((x, y));
                }
            }
        }
    }
    Err(GameError::EmptyMap)
}
