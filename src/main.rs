mod app;
mod config;
mod input;
mod model;
mod render;
mod rules;
mod session;
mod sim;
mod status;
mod ticker;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "cavapet")]
#[command(about = "A pixel pup that lives in your terminal")]
struct Cli {
    /// Real-time milliseconds per simulation tick (overrides settings)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// How long feed/play labels stay up, in milliseconds (overrides settings)
    #[arg(long)]
    status_ms: Option<u64>,

    /// Disable colour
    #[arg(long, default_value_t = false)]
    mono: bool,

    /// Write logs to cavapet.log in the data directory
    #[arg(long, default_value_t = false)]
    log: bool,

    /// Run without a terminal UI and print the final state as JSON
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Headless only: comma-separated actions, e.g. "feed,tick*30,play"
    #[arg(long, default_value = "")]
    actions: String,

    /// Headless only: ticks to run after the actions
    #[arg(long, default_value_t = 0)]
    ticks: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.headless {
        init_stderr_logging();
        let steps = app::parse_script(&cli.actions).context("bad --actions script")?;
        let st = app::run_headless(&steps, cli.ticks);
        println!("{}", serde_json::to_string_pretty(&st)?);
        return Ok(());
    }

    let paths = config::project_paths()?;
    let mut settings = config::load_settings(&paths.settings_path);
    if let Some(ms) = cli.tick_ms {
        settings.tick_ms = ms;
    }
    if let Some(ms) = cli.status_ms {
        settings.status_window_ms = ms;
    }
    if cli.mono {
        settings.enable_color = false;
    }
    if cli.log || settings.log_to_file {
        init_file_logging(&paths.log_path)?;
    }

    app::run(settings, paths)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .init();
}

/// The UI owns stdout, so interactive logs go to a file.
fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
