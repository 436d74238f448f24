//! Structured logging setup
//!
//! The transport emits `tracing` events on its own; nothing here is
//! required to send mail. Applications that do not install a subscriber of
//! their own can call [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter};

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,

    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Filter directives used when `RUST_LOG` is unset
    pub default_filter: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self {
                default_filter: "debug,acton_office365=trace".to_string(),
                format: LogFormat::Pretty,
            }
        } else {
            Self {
                default_filter: "info".to_string(),
                format: LogFormat::Json,
            }
        }
    }
}

impl ObservabilityConfig {
    /// Replace the fallback filter directives
    #[must_use]
    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.default_filter = directives.into();
        self
    }

    /// Replace the output format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Install the global subscriber with build-dependent defaults
///
/// Pretty output at `debug` in debug builds, JSON at `info` in release.
/// `RUST_LOG` overrides the level in both.
///
/// # Example
///
/// ```rust,no_run
/// use acton_office365::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns `TryInitError` if a global subscriber is already installed
pub fn init() -> Result<(), TryInitError> {
    init_with(&ObservabilityConfig::default())
}

/// Install the global subscriber from explicit configuration
///
/// # Errors
///
/// Returns `TryInitError` if a global subscriber is already installed
pub fn init_with(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
}
