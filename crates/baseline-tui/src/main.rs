//! `baseline`: terminal dashboard for system vitals, weather, time and a
//! personal task list.
//!
//! Built on [ratatui](https://ratatui.rs) over the `baseline-core`
//! engine: background producers refresh state on their own timers, and
//! this binary only translates keys and paints the panels the engine
//! marks dirty.
//!
//! Logs go to a file (default `<data dir>/baseline.log`) so they never
//! corrupt the terminal.

mod app;
mod event;
mod theme;
mod tui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use baseline_api::{SystemProbe, TransportConfig, WeatherClient};
use baseline_config::{Overrides, Resolved};
use baseline_core::{Dashboard, Sources};

use crate::app::App;

/// Terminal dashboard: system vitals, weather, clock and todos.
#[derive(Parser, Debug)]
#[command(name = "baseline", version, about)]
struct Cli {
    /// Colour theme (amber, green, blue)
    #[arg(short, long)]
    theme: Option<String>,

    /// Location for weather reports
    #[arg(short, long)]
    location: Option<String>,

    /// Directory for todos, metric history and the default log file
    #[arg(long, env = "BASELINE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log file path (defaults to <data dir>/baseline.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Returns the guard that flushes the writer on drop.
fn setup_tracing(log_file: &Path, verbose: u8) -> Result<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "baseline={level},baseline_core={level},baseline_api={level},baseline_config={level}"
        ))
    });

    let dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("cannot create log directory {}", dir.display()))?;
    let name = log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("baseline.log"));

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<Resolved> {
    let settings = baseline_config::load_settings().wrap_err("failed to load configuration")?;
    let overrides = Overrides {
        theme: cli.theme.clone(),
        location: cli.location.clone(),
        data_dir: cli.data_dir.clone(),
    };
    Ok(baseline_config::resolve(settings, overrides)?)
}

fn build_sources(resolved: &Resolved) -> Result<Sources> {
    let transport = TransportConfig::with_timeout(resolved.weather_timeout);
    let weather = WeatherClient::new(resolved.weather_base_url.clone(), &transport)
        .wrap_err("failed to build weather client")?;
    Ok(Sources {
        metrics: Arc::new(SystemProbe::new()),
        weather: Arc::new(weather),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so failures during setup still restore the terminal.
    tui::install_hooks()?;

    let resolved = load_config(&cli)?;
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| resolved.dashboard.data_dir.join("baseline.log"));
    let _log_guard = setup_tracing(&log_file, cli.verbose)?;

    info!(
        data_dir = %resolved.dashboard.data_dir.display(),
        location = %resolved.dashboard.weather_location,
        theme = %resolved.dashboard.theme,
        weather_api = resolved.dashboard.weather_api_key.is_some(),
        "starting baseline"
    );

    let sources = build_sources(&resolved)?;
    let dashboard = Dashboard::new(resolved.dashboard, sources);
    let producers = dashboard.start();

    let result = App::new(dashboard.clone()).run().await;

    dashboard.request_shutdown();
    producers.shutdown().await;
    info!("baseline stopped");
    result
}
