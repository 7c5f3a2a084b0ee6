use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use simplelog::WriteLogger;

use snake_tui::app::App;
use snake_tui::game::GameConfig;
use snake_tui::prefs::PrefsStore;

#[derive(Parser)]
#[command(name = "snake_tui")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Side of the square play field, in cells
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(8..=64))]
    grid_size: u16,

    /// Where the best score and speed preference are kept
    #[arg(long, default_value = ".snake_prefs.json")]
    prefs: PathBuf,

    /// Append diagnostics to this file (the terminal itself is the board)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), file)
            .context("initializing logger")?;
    }

    let config = GameConfig::new(cli.grid_size as usize);
    let prefs = PrefsStore::load(&cli.prefs);
    log::info!(
        "starting on a {0}x{0} grid at speed {1}",
        config.grid_size,
        prefs.speed()
    );

    App::new(config, prefs).run().await
}
