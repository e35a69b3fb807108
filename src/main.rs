use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_sweeper::game::GameConfig;
use snake_sweeper::leaderboard::LeaderboardStore;
use snake_sweeper::modes::{ConsoleMode, HumanMode};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_sweeper")]
#[command(version, about = "Snake meets Minesweeper")]
struct Cli {
    /// Front-end to play with
    #[arg(long, default_value = "tui")]
    mode: Mode,

    /// Board width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Board height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Food kept on the board
    #[arg(long)]
    food: Option<usize>,

    /// Bombs placed each round
    #[arg(long)]
    bombs: Option<usize>,

    /// Practice round: bombs visible, score not recorded
    #[arg(long)]
    practice: bool,

    /// Leaderboard file
    #[arg(long, default_value = "leaderboard.txt")]
    leaderboard: PathBuf,

    /// JSON round configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Full-screen terminal UI
    Tui,
    /// Line-by-line text console
    Console,
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {:?}", path))?;
            serde_json::from_str::<GameConfig>(&json)
                .with_context(|| format!("Failed to parse config {:?}", path))?
        }
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.board_width = width;
    }
    if let Some(height) = cli.height {
        config.board_height = height;
    }
    if let Some(food) = cli.food {
        config.food_count = food;
    }
    if let Some(bombs) = cli.bombs {
        config.bomb_count = bombs;
    }
    config.practice |= cli.practice;

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

/// The full-screen UI owns the terminal, so logs only go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = load_config(&cli)?;
    let store = LeaderboardStore::new(cli.leaderboard.clone());
    info!(?config, leaderboard = ?store.path(), "starting");

    match cli.mode {
        Mode::Tui => {
            let mut human_mode = HumanMode::new(config, store)?;
            human_mode.run().await?;
        }
        Mode::Console => {
            let stdin = io::stdin();
            let mut console = ConsoleMode::new(config, store, stdin.lock(), io::stdout());
            console.run()?;
        }
    }

    Ok(())
}
