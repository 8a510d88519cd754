/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::Action;
use domain::map::Map;
use sim::step;
use sim::world::Game;
use ui::console::Console;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

#[derive(Parser, Debug)]
#[command(name = "fogcrawl", version, about = "Explore a fog-bound map while creatures multiply in the dark")]
struct Cli {
    /// Map file, one line per row
    #[arg(default_value = "map.txt")]
    map: PathBuf,

    /// Window width in columns (default: terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Window height in rows (default: terminal height)
    #[arg(long)]
    height: Option<u16>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to use instead of searching for config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref());

    let _log_guard = match setup_logging(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("fogcrawl: logging disabled: {e}");
            None
        }
    };
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    match &config.source {
        Some(path) => tracing::info!(path = %path.display(), "configuration loaded"),
        None => tracing::info!("using built-in configuration"),
    }

    // Map problems are fatal and reported before the terminal is touched.
    let map = match Map::load(&cli.map, &config.legend) {
        Ok(map) => map,
        Err(e) => {
            tracing::error!("map load failed: {e}");
            eprintln!("fogcrawl: {e}");
            return ExitCode::FAILURE;
        }
    };

    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    tracing::info!(seed, "rng seeded");

    let rng = StdRng::seed_from_u64(seed);
    let mut game = match Game::new(map, config.fov_radius, config.creatures.clone(), rng) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("session setup failed: {e}");
            eprintln!("fogcrawl: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut console = Console::new(game.map.width, game.map.height);
    let mut input = InputState::new(config.display.fps, GamepadState::new(&config.gamepad));
    let mut renderer = Renderer::new(cli.width, cli.height);

    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let result = game_loop(&mut game, &mut console, &mut renderer, &mut input);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    tracing::info!(turns = game.turn, creatures = game.creatures.len(), "exit");

    if let Err(e) = result {
        tracing::error!("game error: {e}");
        eprintln!("Game error: {e}");
        return ExitCode::FAILURE;
    }

    println!("You lasted {} turns. {} creatures remain in the dark.", game.turn, game.creatures.len());
    ExitCode::SUCCESS
}

fn game_loop(
    game: &mut Game,
    console: &mut Console,
    renderer: &mut Renderer,
    input: &mut InputState,
) -> io::Result<()> {
    loop {
        game.draw(console);
        renderer.present(game, console)?;

        // A blocked move does not take the turn: poll again.
        let action = loop {
            let action = input.wait_action()?;
            if action == Action::Exit || step::player_turn(game, action) {
                break action;
            }
        };
        if action == Action::Exit {
            return Ok(());
        }

        for event in step::creature_phase(game, console) {
            tracing::info!(turn = game.turn, ?event, "{event}");
        }
        tracing::debug!(turn = game.turn, creatures = game.creatures.len(), "turn complete");
    }
}

/// File-only logging: the game owns the terminal, so nothing goes to stderr.
/// The returned guard flushes the non-blocking writer when dropped.
fn setup_logging(config: &GameConfig) -> Result<WorkerGuard, Box<dyn Error>> {
    let log_dir = config
        .log_dir
        .clone()
        .or_else(|| config::data_dir().map(|d| d.join("logs")))
        .ok_or("no data directory for logs")?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "fogcrawl.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
