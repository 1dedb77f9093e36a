//! Pitchrisk: pitcher injury-risk calculator
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pitchrisk::config::AppConfig;
use pitchrisk::tui::App;

fn main() -> Result<()> {
    // Initialize logging.
    //
    // Writing logs to the terminal corrupts the TUI (alternate screen), so an
    // interactive session logs to a file unless told otherwise:
    // - `PITCHRISK_LOG_MODE=file|stdout|auto` (default auto)
    // - `PITCHRISK_LOG_FILE` (default pitchrisk.log)
    let log_mode = std::env::var("PITCHRISK_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file =
            std::env::var("PITCHRISK_LOG_FILE").unwrap_or_else(|_| "pitchrisk.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: a missing directory surfaces on open below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open log file {log_file:?}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    tracing::info!("Starting Pitchrisk...");

    let config = AppConfig::from_env()?;

    // Refuse to start without both artifacts.
    let mut app = App::new(&config).with_context(|| {
        format!(
            "Failed to load artifacts (scaler={:?}, model={:?})",
            config.scaler_path, config.model_path
        )
    })?;
    app.run()?;

    tracing::info!("Pitchrisk shutdown complete.");
    Ok(())
}
