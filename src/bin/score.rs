//! Headless scoring for scripts and batch use.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin score -- innings_pitched_formatted=100 ip_py=80 fastball_avg_spin=2200 ...
//! echo '{"n_clicks": 1, "values": {"arm_angle": "50", ...}}' | cargo run --bin score -- -
//! ```
//!
//! Prints the same text the form would show. Exits with status 1 when the
//! response is an error.

use std::io::Read;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use pitchrisk::application::{load_service, respond, FormResponse, RiskForm};
use pitchrisk::config::AppConfig;

fn usage() -> String {
    "Usage: score <key>=<value>... | score -   (JSON form on stdin)".to_string()
}

/// Build the form from `key=value` arguments, or from JSON on `input` when
/// the only argument is `-`.
fn parse_args<R: Read>(args: &[String], input: R) -> Result<RiskForm> {
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        return Err(anyhow!(usage()));
    }

    if let [only] = args {
        if only == "-" {
            let form: RiskForm =
                serde_json::from_reader(input).context("Failed to read JSON form from stdin")?;
            return Ok(form);
        }
    }

    let mut form = RiskForm::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected <key>=<value>, got {arg:?}\n{}", usage()))?;
        form.set(key, value);
    }
    // Running the binary is the calculate action.
    form.trigger();
    Ok(form)
}

fn exit_status(response: &FormResponse) -> u8 {
    u8::from(response.is_error())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let form = parse_args(&args, std::io::stdin().lock())?;
    let config = AppConfig::from_env()?;
    let service = load_service(&config).context("Failed to load artifacts")?;

    let response = respond(&service, &form);
    println!("{response}");

    Ok(ExitCode::from(exit_status(&response)))
}
