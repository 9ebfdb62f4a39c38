//! Diagnostic logging through `tracing`.
//!
//! Log events go to stderr so they never mix with a JSON report on stdout.
//!
//! - `warn`: units skipped because they failed to parse
//! - `info`: run summary
//! - `debug`: config discovery, per-unit progress, suppressed findings
//! - `trace`: every filter-query site the scanner recognizes
//!
//! `RUST_LOG` replaces the level chosen from `-v` flags.

use tracing::Level;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to this crate when `RUST_LOG` is unset.
    pub level: Level,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// - 0 (no `-v`): warn
    /// - 1 (`-v`): debug
    /// - 2+ (`-vv`): trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // other crates stay at warn
        EnvFilter::new(format!(
            "warn,topicguard={}",
            level.as_str().to_lowercase()
        ))
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();
    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()
}
