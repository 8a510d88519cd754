/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, or searches the executable's
/// directory, the CWD and `~/.local/share/fogcrawl`.
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems are collected in `warnings` and logged once logging is up.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::map::Legend;
use crate::domain::tile::{Rgb, TileSpec, FOG_BRIGHTNESS};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub fov_radius: i32,
    pub creatures: CreatureConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    pub legend: Legend,
    pub log_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatureConfig {
    pub initial_spawn_attempts: u32,
    pub base_speed: u32,   // hundredths of a step per tick
    pub grown_speed: u32,
    pub elder_speed: u32,
    pub reproduce_every: u32,
    pub grow_at: u32,
    pub elder_at: u32,
    pub glyph: char,
    pub grown_glyph: char,
    pub elder_glyph: char,
    pub color: Rgb,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub fps: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pass: Vec<String>,
    pub exit: Vec<String>,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        let t = TomlCreatures::default();
        CreatureConfig {
            initial_spawn_attempts: t.initial_spawn_attempts,
            base_speed: t.base_speed,
            grown_speed: t.grown_speed,
            elder_speed: t.elder_speed,
            reproduce_every: t.reproduce_every,
            grow_at: t.grow_at,
            elder_at: t.elder_at,
            glyph: t.glyph,
            grown_glyph: t.grown_glyph,
            elder_glyph: t.elder_glyph,
            color: t.color,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    fov: TomlFov,
    #[serde(default)]
    creatures: TomlCreatures,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    legend: HashMap<String, TileSpec>,
}

#[derive(Deserialize, Debug)]
struct TomlFov {
    #[serde(default = "default_radius")]
    radius: i32,
}

#[derive(Deserialize, Debug)]
struct TomlCreatures {
    #[serde(default = "default_spawn_attempts")]
    initial_spawn_attempts: u32,
    #[serde(default = "default_base_speed")]
    base_speed: u32,
    #[serde(default = "default_grown_speed")]
    grown_speed: u32,
    #[serde(default = "default_elder_speed")]
    elder_speed: u32,
    #[serde(default = "default_reproduce_every")]
    reproduce_every: u32,
    #[serde(default = "default_grow_at")]
    grow_at: u32,
    #[serde(default = "default_elder_at")]
    elder_at: u32,
    #[serde(default = "default_glyph")]
    glyph: char,
    #[serde(default = "default_grown_glyph")]
    grown_glyph: char,
    #[serde(default = "default_elder_glyph")]
    elder_glyph: char,
    #[serde(default = "default_creature_color")]
    color: Rgb,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_fog_brightness")]
    fog_brightness: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_pass")]
    pass: Vec<String>,
    #[serde(default = "default_pad_exit")]
    exit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    log_dir: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_radius() -> i32 { 30 }
fn default_spawn_attempts() -> u32 { 10 }
fn default_base_speed() -> u32 { 20 }     // one step every 5 ticks
fn default_grown_speed() -> u32 { 40 }
fn default_elder_speed() -> u32 { 60 }
fn default_reproduce_every() -> u32 { 50 }
fn default_grow_at() -> u32 { 200 }
fn default_elder_at() -> u32 { 400 }
fn default_glyph() -> char { '.' }
fn default_grown_glyph() -> char { 'o' }
fn default_elder_glyph() -> char { 'O' }
fn default_creature_color() -> Rgb { Rgb::RED }
fn default_fps() -> u32 { 20 }
fn default_fog_brightness() -> f32 { FOG_BRIGHTNESS }

fn default_pad_pass() -> Vec<String> { vec!["A".into()] }
fn default_pad_exit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlFov {
    fn default() -> Self {
        TomlFov { radius: default_radius() }
    }
}

impl Default for TomlCreatures {
    fn default() -> Self {
        TomlCreatures {
            initial_spawn_attempts: default_spawn_attempts(),
            base_speed: default_base_speed(),
            grown_speed: default_grown_speed(),
            elder_speed: default_elder_speed(),
            reproduce_every: default_reproduce_every(),
            grow_at: default_grow_at(),
            elder_at: default_elder_at(),
            glyph: default_glyph(),
            grown_glyph: default_grown_glyph(),
            elder_glyph: default_elder_glyph(),
            color: default_creature_color(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { fps: default_fps(), fog_brightness: default_fog_brightness() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { pass: default_pad_pass(), exit: default_pad_exit() }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        let mut warnings = vec![];
        GameConfig::from_toml(TomlConfig::default(), None, &mut warnings)
    }
}

impl GameConfig {
    /// Load from `explicit` if given, otherwise search for `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut warnings = vec![];
        let (toml_cfg, source) = match explicit {
            Some(path) => match read_toml(path, &mut warnings) {
                Some(cfg) => (cfg, Some(path.to_path_buf())),
                None => (TomlConfig::default(), None),
            },
            None => search_toml(&candidate_dirs(), &mut warnings),
        };
        let mut config = GameConfig::from_toml(toml_cfg, source, &mut warnings);
        config.warnings = warnings;
        config
    }

    /// Parse a config document without touching the filesystem.
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        let mut warnings = vec![];
        let mut config = GameConfig::from_toml(toml_cfg, None, &mut warnings);
        config.warnings = warnings;
        Ok(config)
    }

    fn from_toml(t: TomlConfig, source: Option<PathBuf>, warnings: &mut Vec<String>) -> Self {
        let mut legend = if t.legend.is_empty() {
            Legend::standard()
        } else {
            let mut entries = HashMap::new();
            for (key, spec) in t.legend {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => { entries.insert(c, spec); }
                    _ => warnings.push(format!("legend key {key:?} is not a single character, ignored")),
                }
            }
            Legend::new(entries)
        };
        legend.fog_brightness = t.display.fog_brightness.clamp(0.0, 1.0);

        GameConfig {
            fov_radius: t.fov.radius.max(0),
            creatures: CreatureConfig {
                initial_spawn_attempts: t.creatures.initial_spawn_attempts,
                base_speed: t.creatures.base_speed,
                grown_speed: t.creatures.grown_speed,
                elder_speed: t.creatures.elder_speed,
                reproduce_every: t.creatures.reproduce_every.max(1),
                grow_at: t.creatures.grow_at,
                elder_at: t.creatures.elder_at,
                glyph: t.creatures.glyph,
                grown_glyph: t.creatures.grown_glyph,
                elder_glyph: t.creatures.elder_glyph,
                color: t.creatures.color,
            },
            display: DisplayConfig { fps: t.display.fps.max(1) },
            gamepad: GamepadConfig { pass: t.gamepad.pass, exit: t.gamepad.exit },
            legend,
            log_dir: t.general.log_dir.map(PathBuf::from),
            seed: t.general.seed,
            source,
            warnings: vec![],
        }
    }
}

/// Per-user data directory (`~/.local/share/fogcrawl`).
pub fn data_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share/fogcrawl"))
}

/// Candidate directories to search: exe dir + CWD + data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Some(data) = data_dir() {
        if data.is_dir() && !dirs.iter().any(|d| d == &data) {
            dirs.push(data);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn search_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            if let Some(cfg) = read_toml(&path, warnings) {
                return (cfg, Some(path));
            }
            return (TomlConfig::default(), None);
        }
    }
    (TomlConfig::default(), None)
}

fn read_toml(path: &Path, warnings: &mut Vec<String>) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
                None
            }
        },
        Err(e) => {
            warnings.push(format!("could not read {}: {e}", path.display()));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.fov_radius, 30);
        assert_eq!(cfg.creatures, CreatureConfig::default());
        assert_eq!(cfg.creatures.base_speed, 20);
        assert_eq!(cfg.creatures.reproduce_every, 50);
        assert_eq!(cfg.display.fps, 20);
        assert!(cfg.legend.get('#').is_some());
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[fov]\nradius = 8\n[creatures]\ngrow_at = 100\ncolor = [10, 20, 30]\n[general]\nseed = 7\n",
        )
        .unwrap();
        assert_eq!(cfg.fov_radius, 8);
        assert_eq!(cfg.creatures.grow_at, 100);
        assert_eq!(cfg.creatures.elder_at, 400);
        assert_eq!(cfg.creatures.color, Rgb::new(10, 20, 30));
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn legend_tables_replace_builtin() {
        let cfg = GameConfig::parse(
            r#"
            [legend."."]
            glyph = "."
            color = [200, 200, 200]
            background = [0, 0, 0]
            transparent = true
            walkable = true

            [legend."too long"]
            glyph = "x"
            color = [0, 0, 0]
            background = [0, 0, 0]
            transparent = false
            walkable = false
            "#,
        )
        .unwrap();
        assert!(cfg.legend.get('.').is_some_and(|s| s.walkable));
        assert!(cfg.legend.get('#').is_none());
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn bad_document_is_an_error() {
        assert!(GameConfig::parse("[fov]\nradius = \"far\"").is_err());
    }

    #[test]
    fn unreadable_explicit_path_falls_back() {
        let cfg = GameConfig::load(Some(Path::new("/nonexistent/fogcrawl.toml")));
        assert_eq!(cfg.fov_radius, 30);
        assert!(cfg.source.is_none());
        assert_eq!(cfg.warnings.len(), 1);
    }
}
