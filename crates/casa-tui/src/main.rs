//! `casa-tui` — Terminal remote control for the casa smart home.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `casa-core`'s [`Remote`](casa_core::Remote). Shows a connecting screen
//! until the server answers, a loading screen until the first snapshot
//! arrives, then the three-room dashboard.
//!
//! Logs are written to a file (default `/tmp/casa-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! connection and snapshot changes into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use casa_core::{Remote, RemoteConfig};

use crate::app::App;

/// Terminal remote control for a casa smart home server.
#[derive(Parser, Debug)]
#[command(name = "casa-tui", version, about)]
struct Cli {
    /// Server endpoint (e.g., http://localhost:3000)
    #[arg(short = 'e', long, env = "CASA_ENDPOINT")]
    endpoint: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Log file path (defaults to /tmp/casa-tui.log)
    #[arg(long, default_value = "/tmp/casa-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// TUI owns the terminal. Hold the returned guard until exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "casa_tui={log_level},casa_core={log_level},casa_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("casa-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Priority: CLI flag > environment > config file > built-in default.
fn load_settings(cli: &Cli) -> Result<casa_config::Config> {
    let mut cfg = match &cli.config {
        Some(path) => casa_config::load_config_from(path)?,
        None => casa_config::load_config()?,
    };
    if let Some(endpoint) = &cli.endpoint {
        cfg.endpoint.clone_from(endpoint);
    }
    Ok(cfg)
}

/// Persist validated settings so later runs need no flags.
fn save_settings(cli: &Cli, cfg: &casa_config::Config) -> Result<PathBuf> {
    let path = match &cli.config {
        Some(path) => {
            casa_config::save_config_to(cfg, path)?;
            path.clone()
        }
        None => {
            casa_config::save_config(cfg)?;
            casa_config::config_path()
        }
    };
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config errors are reported before the terminal is taken over
    let settings = load_settings(&cli)?;
    let config: RemoteConfig = settings.to_remote_config()?;

    if cli.save_config {
        let path = save_settings(&cli, &settings)?;
        println!("Saved settings to {}", path.display());
        return Ok(());
    }

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    info!(endpoint = %config.endpoint, "starting casa-tui");

    let mut app = App::new(Remote::new(config));
    app.run().await?;

    Ok(())
}
