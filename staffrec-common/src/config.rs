//! Configuration loading and resolution
//!
//! Settings come from four tiers, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! The settings object is constructed once in `main` and passed down;
//! nothing reads configuration from globals after startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "STAFFREC_CONFIG";
/// Environment variable overriding the database path
pub const DATABASE_ENV: &str = "STAFFREC_DB";
/// Environment variable overriding the bind address
pub const BIND_ENV: &str = "STAFFREC_BIND";
/// Environment variable supplying the exchange-rates API key
pub const RATES_API_KEY_ENV: &str = "STAFFREC_RATES_API_KEY";

/// Exchange-rate provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatesSettings {
    /// Base URL of the exchangeratesapi.io-style service
    pub api_url: String,
    pub api_key: Option<String>,
    /// Serve the fixed sample table instead of calling the rate API.
    /// Selected automatically when no API key is configured.
    pub use_sample_rates: bool,
    /// How long a fetched rate stays valid, in seconds
    pub cache_ttl_secs: u64,
}

impl Default for RatesSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.exchangeratesapi.io/v1".to_string(),
            api_key: None,
            use_sample_rates: false,
            cache_ttl_secs: 3600,
        }
    }
}

impl RatesSettings {
    /// Whether the sample table should be used for rate lookups
    pub fn use_sample(&self) -> bool {
        self.use_sample_rates || self.api_key.is_none()
    }
}

/// Service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the backend listens on
    pub bind_addr: String,
    /// SQLite database file path
    pub database_path: PathBuf,
    pub rates: RatesSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8710".to_string(),
            database_path: default_database_path(),
            rates: RatesSettings::default(),
        }
    }
}

impl Settings {
    /// Resolve settings from all four tiers.
    ///
    /// `cli_config`, `cli_database` and `cli_bind` are the command-line
    /// overrides; pass `None` for any the user did not supply.
    pub fn resolve(
        cli_config: Option<&Path>,
        cli_database: Option<&Path>,
        cli_bind: Option<&str>,
    ) -> Result<Self> {
        let config_path = cli_config
            .map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(default_config_path);

        let mut settings = match config_path {
            Some(ref path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };

        if let Ok(path) = std::env::var(DATABASE_ENV) {
            settings.database_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var(BIND_ENV) {
            settings.bind_addr = addr;
        }
        if let Ok(key) = std::env::var(RATES_API_KEY_ENV) {
            settings.rates.api_key = Some(key);
        }

        if let Some(path) = cli_database {
            settings.database_path = path.to_path_buf();
        }
        if let Some(addr) = cli_bind {
            settings.bind_addr = addr.to_string();
        }

        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Platform config file location, e.g. `~/.config/staffrec/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("staffrec").join("config.toml"))
}

/// Platform data location for the database, e.g.
/// `~/.local/share/staffrec/staffrec.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("staffrec").join("staffrec.db"))
        .unwrap_or_else(|| PathBuf::from("./staffrec.db"))
}
