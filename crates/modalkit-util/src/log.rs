//! Logging setup using tracing.
//!
//! Library code only emits `tracing` events; hosts call [`init`] once to
//! install a subscriber.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Whether to print logs to stderr.
    pub print: bool,
    /// Log level.
    pub level: LogLevel,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
}

impl LogConfig {
    /// Printing config at the given level.
    pub fn stderr(level: LogLevel) -> Self {
        Self {
            print: true,
            level,
            include_location: false,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    ///
    /// Only modalkit targets get the configured level, everything else
    /// stays at `warn`.
    pub fn directive(&self) -> String {
        format!("warn,modalkit_core={0},modalkit_util={0}", self.level.as_str())
    }
}

/// Initialize logging with the given configuration.
///
/// This should be called once at application startup. Returns `false` if a
/// global subscriber was already installed.
pub fn init(config: LogConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.print {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        subscriber.with(fmt_layer).try_init().is_ok()
    } else {
        subscriber.try_init().is_ok()
    }
}

/// Create a tracing span for one modal operation.
#[macro_export]
macro_rules! modal_span {
    ($op:expr, $view:expr) => {
        tracing::debug_span!("modal", op = $op, view = %$view)
    };
}
