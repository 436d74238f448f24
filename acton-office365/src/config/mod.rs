//! Configuration for the Office 365 transport
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `OFFICE365_` prefix)
//! 2. `./office365.toml` (or an explicit path)
//! 3. Hardcoded defaults (fallback)
//!
//! The access token is never part of the configuration; it is passed to the
//! transport at construction.
//!
//! # Example Configuration
//!
//! ```toml
//! # office365.toml
//! graph_base_url = "https://graph.microsoft.com/v1.0"
//! timeout_secs = 30
//! save_to_sent_items = true
//! send_as_sender = false
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_office365::config::Office365Config;
//!
//! # fn example() -> Result<(), figment::Error> {
//! let config = Office365Config::load()?;
//! println!("sending through {}", config.graph_base_url);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default Microsoft Graph endpoint
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// File read by [`Office365Config::load`]
pub const DEFAULT_CONFIG_FILE: &str = "office365.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "OFFICE365_";

/// Office 365 transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Office365Config {
    /// Graph API base URL, without a trailing slash
    pub graph_base_url: String,

    /// Overall HTTP request timeout; none by default
    pub timeout_secs: Option<u64>,

    /// `User-Agent` sent with every request
    pub user_agent: String,

    /// Value for Graph's `saveToSentItems`; omitted when unset
    pub save_to_sent_items: Option<bool>,

    /// Put the message's first sender on the wire as `from` (send-as)
    pub send_as_sender: bool,
}

impl Default for Office365Config {
    fn default() -> Self {
        Self {
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: concat!("acton-office365/", env!("CARGO_PKG_VERSION")).to_string(),
            save_to_sent_items: None,
            send_as_sender: false,
        }
    }
}

impl Office365Config {
    /// Load from `./office365.toml` (if present) and `OFFICE365_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or a value has the
    /// wrong type
    pub fn load() -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }

        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load from a specific file, with `OFFICE365_*` variables on top
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the wrong type
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extract from an application-provided figment
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type
    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let mut config: Self = figment.extract()?;
        config.graph_base_url = config.graph_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Use a different Graph endpoint (sovereign clouds, test servers)
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.graph_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set Graph's `saveToSentItems`
    #[must_use]
    pub const fn with_save_to_sent_items(mut self, save: bool) -> Self {
        self.save_to_sent_items = Some(save);
        self
    }

    /// Send the message's first sender as `from`
    #[must_use]
    pub const fn with_send_as_sender(mut self) -> Self {
        self.send_as_sender = true;
        self
    }
}
