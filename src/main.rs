use std::fs::{self, File, OpenOptions};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use tile_snake::canvas::TerminalCanvas;
use tile_snake::config::{DEFAULT_PIXEL_DENSITY, FRAME_INTERVAL};
use tile_snake::game::Game;
use tile_snake::grid::{GridSize, tile_size};
use tile_snake::input::{Command, InputHandler};
use tile_snake::renderer::StatusInfo;
use tile_snake::scheduler::FrameQueue;
use tile_snake::surface::Presenter;
use tile_snake::terminal_runtime::{GameScreen, canvas_size_for, restore_terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

const APP_DIR_NAME: &str = "tile-snake";
const LOG_FILE_NAME: &str = "tile-snake.log";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Display pixel density; tiles are round(10 * density) pixels wide and
    /// one pixel is half a terminal cell.
    #[arg(long, default_value_t = DEFAULT_PIXEL_DENSITY)]
    density: f32,

    /// Canvas width in pixels. Defaults to the terminal width.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels. Defaults to twice the terminal height.
    #[arg(long)]
    height: Option<u32>,

    /// Seed for food placement, to replay a game.
    #[arg(long)]
    seed: Option<u64>,

    /// Log file path. Defaults to the platform data directory.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.clone());
    install_panic_hook();

    run(cli)
}

fn run(cli: Cli) -> io::Result<()> {
    let (columns, rows) = crossterm::terminal::size()?;
    let (fit_width, fit_height) = canvas_size_for(columns, rows);
    let width = cli.width.unwrap_or(fit_width);
    let height = cli.height.unwrap_or(fit_height);

    let tile = tile_size(cli.density);
    let grid = GridSize::from_surface(width, height, tile).map_err(io::Error::other)?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(
        width,
        height,
        tile,
        grid_width = grid.width,
        grid_height = grid.height,
        seed,
        "starting"
    );

    let mut screen = GameScreen::open()?;
    let mut game = Game::new(
        TerminalCanvas::new(width, height),
        FrameQueue::new(),
        Presenter::new(tile, cli.density),
        grid,
        seed,
    );
    let mut input = InputHandler::new();
    let started = Instant::now();

    loop {
        let info = StatusInfo {
            score: game.score(),
            length: game.snake.len(),
            loop_time_ms: game.loop_time_ms(),
            status: game.status(),
            end_cause: game.session().end_cause,
        };
        screen.draw(game.surface(), info)?;

        // Input lands before the frame below, so a turn applies to the next move.
        for command in input.drain(FRAME_INTERVAL, screen.canvas_area())? {
            match game.handle(command) {
                Some(Command::Quit) => {
                    info!(score = game.score(), "quit");
                    return Ok(());
                }
                Some(Command::ToggleFullscreen) => screen.toggle_fullscreen(),
                _ => {}
            }
        }

        let now_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        game.pump(now_ms);
    }
}

fn init_tracing(log_file: Option<PathBuf>) {
    let Some(path) = log_file.or_else(default_log_path) else {
        return;
    };
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Failed to open log file {}: {error}", path.display());
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Opens `path` for appending, creating missing parent directories first.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            io::Error::new(
                error.kind(),
                format!("cannot create log directory {}: {error}", parent.display()),
            )
        })?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn default_log_path() -> Option<PathBuf> {
    let mut base = dirs::data_local_dir()?;
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    Some(base)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
