#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
mod analyze;
mod cli;
mod error_fmt;
mod feedback;
mod logging;
mod render;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::Result;
use squat_core::error::AnalysisError;

use crate::analyze::Finished;
use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    // A second install (e.g. under a test harness) is harmless.
    let _ = color_eyre::install();

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn load_config(path: Option<&Path>) -> Result<squat_config::Config> {
    let Some(path) = path else {
        return Ok(squat_config::Config::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        AnalysisError::Config(format!("read config {}: {e}", path.display()))
    })?;
    let cfg = squat_config::load_toml(&text).map_err(|e| {
        AnalysisError::Config(format!("parse config {}: {e}", path.display()))
    })?;
    cfg.validate()
        .map_err(|e| AnalysisError::Config(format!("{e}")))?;
    Ok(cfg)
}

/// Print the result; a cancelled run still prints what it saw, then reports
/// the cancellation.
fn emit(done: &Finished, json: bool) -> Result<()> {
    if json {
        render::print_json(done);
    } else {
        render::print_text(done);
    }
    if done.run.cancelled {
        return Err(AnalysisError::Cancelled.into());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    logging::init(cli.json, &cli.log_level, &cfg.logging)?;
    tracing::debug!(config = ?cli.config, "config loaded");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    match cli.cmd {
        Commands::Analyze {
            input,
            format,
            duration_s,
            threaded,
            timeline,
        } => {
            let done = analyze::run_analyze(
                &cfg, &input, format, duration_s, threaded, timeline, shutdown,
            )?;
            emit(&done, cli.json)?;
        }
        Commands::Simulate {
            reps,
            fps,
            faults,
            noise,
            timeline,
        } => {
            let done =
                analyze::run_simulate(&cfg, reps, fps, &faults, noise, timeline, shutdown)?;
            emit(&done, cli.json)?;
        }
        Commands::CheckConfig => {
            // Build a session too, so engine-level checks run.
            squat_core::AnalysisSession::builder()
                .with_config((&cfg).into())
                .build()?;
            if cli.json {
                println!("{}", serde_json::json!({ "status": "ok" }));
            } else {
                println!("config ok");
            }
        }
    }
    Ok(())
}
