//! # rag-config
//!
//! Client configuration, merged with figment from (lowest to highest):
//! built-in defaults, `~/.config/ragdesk/config.toml`,
//! `./.ragdesk/config.toml`, and `RAGDESK_*` environment variables.
//!
//! Nested keys use `__` in variable names, so `RAGDESK_API__BASE_URL`
//! sets `api.base_url` and `RAGDESK_POLLING__INTERVAL_MS` sets
//! `polling.interval_ms`.
//!
//! ```no_run
//! let config = rag_config::RagConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.api.normalized_base_url());
//! ```

mod api;
mod error;
mod general;
mod polling;

pub use api::{ApiConfig, DEFAULT_BASE_URL};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use polling::PollingConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "RAGDESK_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RagConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl RagConfig {
    /// Merge every source and validate the result. `.env` files are not
    /// read here; see [`RagConfig::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::Figment`] if a source does not parse,
    /// [`ConfigError::InvalidValue`] if the merged API section is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.api.validate()?;
        Ok(config)
    }

    /// [`RagConfig::load`] after importing `./.env` into the environment.
    ///
    /// # Errors
    ///
    /// See [`RagConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        if let Err(error) = dotenvy::dotenv()
            && !error.not_found()
        {
            tracing::warn!(%error, "ignoring unreadable .env file");
        }
        Self::load()
    }

    /// The provider chain behind [`RagConfig::load`], exposed so tests can
    /// extract from it inside a `figment::Jail`.
    #[must_use]
    pub fn figment() -> Figment {
        let files = Self::config_files()
            .into_iter()
            .filter(|path| path.is_file())
            .fold(Figment::from(Serialized::defaults(Self::default())), |figment, path| {
                figment.merge(Toml::file(path))
            });
        files.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// TOML files consulted, later entries overriding earlier ones.
    #[must_use]
    pub fn config_files() -> Vec<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("ragdesk").join("config.toml"))
            .into_iter()
            .chain([PathBuf::from(".ragdesk").join("config.toml")])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_sources() {
        let config = RagConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.polling.interval_ms, 3000);
        assert_eq!(config.general.default_format, "json");
    }

    #[test]
    fn project_file_is_consulted_last() {
        let files = RagConfig::config_files();
        assert_eq!(files.last(), Some(&PathBuf::from(".ragdesk/config.toml")));
    }

    #[test]
    fn extracts_with_no_files_present() {
        figment::Jail::expect_with(|_jail| {
            let config: RagConfig = RagConfig::figment().extract()?;
            assert_eq!(config.api.timeout_secs, 30);
            Ok(())
        });
    }
}
