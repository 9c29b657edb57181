//! Logging initialization for the command-line runner.
//!
//! The library only emits `tracing` events; the binary installs a
//! `tracing-subscriber` formatter that writes to stderr, so stdout stays
//! free for command output. `RUST_LOG` directives are honoured on top of
//! the configured level.
//!
//! ```no_run
//! use single_regulon::logging::{LogConfig, LogFormat, LogLevel, init_logging};
//!
//! init_logging(&LogConfig { level: LogLevel::Debug, format: LogFormat::Text }).unwrap();
//! tracing::info!(gene_set = "ageing", "Starting analysis");
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON lines for structured log collection
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Filter at `level` for this crate and warnings elsewhere, with `RUST_LOG` layered on top.
pub fn build_filter(level: LogLevel) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(format!("warn,single_regulon={level}"));
    if let Ok(directives) = std::env::var("RUST_LOG") {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            filter = filter.add_directive(
                directive
                    .trim()
                    .parse()
                    .with_context(|| format!("Failed to parse RUST_LOG directive '{directive}'"))?,
            );
        }
    }
    Ok(filter)
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = build_filter(config.level)?;
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to install log subscriber")?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init()
            .context("Failed to install log subscriber")?,
    }

    Ok(())
}
