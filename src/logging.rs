//! Structured logging setup.
//!
//! Pretty output for development, JSON for production, selected via the
//! `ENVIRONMENT`/`LOG_FORMAT` variables. Filtering goes through the standard
//! `RUST_LOG` env filter.

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging setup.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub output: LogOutput,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production" || environment == "prod";

        Self {
            format: if is_production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            output: LogOutput::Stderr,
        }
    }
}

impl LoggingConfig {
    /// Create a logging configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(format) = env::var("LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => config.format,
            };
        }

        if let Ok(output) = env::var("LOG_OUTPUT") {
            config.output = match output.to_lowercase().as_str() {
                "stdout" => LogOutput::Stdout,
                "stderr" => LogOutput::Stderr,
                _ => config.output,
            };
        }

        config
    }
}

/// Initialize the global tracing subscriber.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,building_energy_api=debug"));

    let registry = tracing_subscriber::registry().with(filter);

    match (config.format, config.output) {
        (LogFormat::Json, LogOutput::Stdout) => registry
            .with(fmt::layer().json().with_writer(std::io::stdout))
            .try_init()?,
        (LogFormat::Json, LogOutput::Stderr) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        (LogFormat::Pretty, LogOutput::Stdout) => registry
            .with(fmt::layer().with_writer(std::io::stdout))
            .try_init()?,
        (LogFormat::Pretty, LogOutput::Stderr) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
