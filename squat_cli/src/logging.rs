//! Tracing setup: console layer plus an optional JSON file layer.

use eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::cli::FILE_GUARD;

fn filter(level: &str) -> EnvFilter {
    // RUST_LOG wins over the flag
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn init(json: bool, console_level: &str, logging: &squat_config::Logging) -> eyre::Result<()> {
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter(console_level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter(console_level))
            .boxed()
    };

    let file_layer = match logging.file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .wrap_err_with(|| format!("create log directory {}", dir.display()))?;
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let level = logging.level.as_deref().unwrap_or("info");
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_filter(EnvFilter::new(level))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}
