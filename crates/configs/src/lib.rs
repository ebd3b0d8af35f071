//! # configs
//!
//! Layered runtime configuration: built-in defaults, then an optional
//! `config/default.toml`, then `DRAFTROOM_`-prefixed environment
//! variables. A `.env` file is honored before the environment is read.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub autosave: AutosaveSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutosaveSettings {
    /// Debounce: editing must stop this long before the interval starts.
    pub settle_ms: u64,
    /// Periodic delay once content has settled.
    pub interval_ms: u64,
    /// User-visible autosave notices per session.
    pub max_notices: u32,
}

impl AutosaveSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string; only read when a database-backed store is
    /// compiled in.
    pub url: SecretString,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentitySettings {
    /// The author this session acts as; none means signed out.
    pub user: Option<String>,
}

impl AppConfig {
    /// Loads the layered configuration.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Config::builder()
            .set_default("autosave.settle_ms", 2_000i64)?
            .set_default("autosave.interval_ms", 28_000i64)?
            .set_default("autosave.max_notices", 3i64)?
            .set_default("database.url", "sqlite::memory:")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("DRAFTROOM").separator("__"))
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        debug!(
            settle_ms = config.autosave.settle_ms,
            interval_ms = config.autosave.interval_ms,
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::load().expect("defaults must load");
        assert_eq!(config.autosave.settle(), Duration::from_secs(2));
        assert_eq!(config.autosave.interval(), Duration::from_secs(28));
        assert_eq!(config.autosave.max_notices, 3);
        assert!(config.identity.user.is_none());
    }

    #[test]
    fn durations_convert_from_millis() {
        let settings = AutosaveSettings {
            settle_ms: 1_500,
            interval_ms: 10_000,
            max_notices: 1,
        };
        assert_eq!(settings.settle(), Duration::from_millis(1_500));
        assert_eq!(settings.interval(), Duration::from_secs(10));
    }
}
