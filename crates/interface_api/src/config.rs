//! API configuration

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use core_kernel::CoreError;
use serde::Deserialize;

/// Default location of the spreadsheet loaded at startup
pub const DEFAULT_SEED_DATA_PATH: &str = "/data/funds_data.xlsx";

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Elasticsearch base URL
    pub search_url: String,
    /// Elasticsearch index holding fund documents
    pub search_index: String,
    /// Spreadsheet ingested once at startup; empty disables the seed load
    pub seed_data_path: String,
    /// Log level
    pub log_level: String,
    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
    /// Records per dual-write batch
    pub ingest_batch_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: infra_db::DEFAULT_DATABASE_URL.to_string(),
            search_url: "http://localhost:9200".to_string(),
            search_index: "funds".to_string(),
            seed_data_path: DEFAULT_SEED_DATA_PATH.to_string(),
            log_level: "info".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            ingest_batch_size: domain_fund::BATCH_SIZE,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `FUNDS_`-prefixed environment variables
    ///
    /// Unset variables keep their defaults, e.g. `FUNDS_PORT=9090` only
    /// overrides the port. `DATABASE_URL` and `RUST_LOG` are used when their
    /// prefixed counterparts are unset.
    ///
    /// # Errors
    ///
    /// Any variable that does not deserialize (e.g. `FUNDS_PORT=abc`) fails
    /// the whole load; nothing falls back silently.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(
            Environment::with_prefix("FUNDS"),
            std::env::var("DATABASE_URL").ok(),
            std::env::var("RUST_LOG").ok(),
        )
    }

    /// Builds the configuration from an environment source and the
    /// unprefixed fallbacks
    pub fn from_sources(
        environment: Environment,
        database_url: Option<String>,
        log_level: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        // Defaults rank below the environment source
        if let Some(url) = database_url {
            builder = builder.set_default("database_url", url)?;
        }
        if let Some(level) = log_level {
            builder = builder.set_default("log_level", level)?;
        }

        builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Checks values the server cannot start without
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::configuration("host must not be empty"));
        }
        if self.database_url.trim().is_empty() {
            return Err(CoreError::configuration("database_url must not be empty"));
        }
        if !self.search_url.starts_with("http://") && !self.search_url.starts_with("https://") {
            return Err(CoreError::configuration(format!(
                "search_url must be an http(s) URL, got '{}'",
                self.search_url
            )));
        }
        if self.search_index.trim().is_empty() {
            return Err(CoreError::configuration("search_index must not be empty"));
        }
        if self.max_upload_bytes == 0 {
            return Err(CoreError::configuration("max_upload_bytes must be positive"));
        }
        if self.ingest_batch_size == 0 {
            return Err(CoreError::configuration("ingest_batch_size must be positive"));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Seed spreadsheet path, if a seed load is configured
    pub fn seed_path(&self) -> Option<PathBuf> {
        let path = self.seed_data_path.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::with_prefix("FUNDS").source(Some(vars))
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let config = ApiConfig::from_sources(
            environment(&[
                ("FUNDS_PORT", "9090"),
                ("FUNDS_SEARCH_URL", "http://es:9200"),
                ("FUNDS_INGEST_BATCH_SIZE", "250"),
            ]),
            None,
            None,
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.search_url, "http://es:9200");
        assert_eq!(config.ingest_batch_size, 250);
        assert_eq!(config.search_index, "funds");
    }

    #[test]
    fn test_malformed_variable_fails_the_load() {
        let result = ApiConfig::from_sources(
            environment(&[
                ("FUNDS_PORT", "abc"),
                ("FUNDS_DATABASE_URL", "postgres://db/funds"),
            ]),
            None,
            None,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_unprefixed_fallbacks_rank_below_prefixed_variables() {
        let fallback_only = ApiConfig::from_sources(
            environment(&[]),
            Some("postgres://fallback/funds".to_string()),
            Some("debug".to_string()),
        )
        .unwrap();
        assert_eq!(fallback_only.database_url, "postgres://fallback/funds");
        assert_eq!(fallback_only.log_level, "debug");

        let prefixed = ApiConfig::from_sources(
            environment(&[("FUNDS_DATABASE_URL", "postgres://primary/funds")]),
            Some("postgres://fallback/funds".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(prefixed.database_url, "postgres://primary/funds");
        assert_eq!(prefixed.log_level, "info");
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.ingest_batch_size, 500);
        assert_eq!(config.seed_path(), Some(PathBuf::from(DEFAULT_SEED_DATA_PATH)));
    }

    #[test]
    fn test_blank_seed_path_disables_seed_load() {
        let config = ApiConfig {
            seed_data_path: "  ".to_string(),
            ..Default::default()
        };

        assert_eq!(config.seed_path(), None);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_batch = ApiConfig {
            ingest_batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(zero_batch.validate(), Err(CoreError::Configuration(_))));

        let bad_url = ApiConfig {
            search_url: "localhost:9200".to_string(),
            ..Default::default()
        };
        let error = bad_url.validate().unwrap_err();
        assert!(error.to_string().contains("search_url"));
    }
}
