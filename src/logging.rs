//! Tracing subscriber setup

use std::io;
use std::path::Path;
use std::str::FromStr;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Where log output goes. The TUI owns stdout, so it logs to a file or not at all.
#[derive(Clone, Copy, Debug)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

/// Keeps the background writer alive; drop it to flush.
#[allow(dead_code)]
pub struct LoggerGuard(Option<WorkerGuard>);

fn parse_level(level: &str) -> LevelFilter {
    match LevelFilter::from_str(level) {
        Ok(level) => level,
        Err(_) => {
            eprintln!("Invalid log level '{level}', defaulting to 'info'");
            LevelFilter::INFO
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
pub fn init_logging(target: LogTarget<'_>, level: &str) -> io::Result<LoggerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());

    match target {
        LogTarget::Off => Ok(LoggerGuard(None)),
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true)
                .with_filter(filter);
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(io::Error::other)?;
            Ok(LoggerGuard(None))
        }
        LogTarget::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let (non_blocking, guard) = NonBlocking::new(file);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(io::Error::other)?;
            Ok(LoggerGuard(Some(guard)))
        }
    }
}
