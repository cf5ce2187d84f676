//! Storage configuration.
//!
//! Connection settings and naming configuration for the reviews storage layer,
//! loaded once at process start and immutable afterwards.

use std::env;

use serde::Deserialize;

use crate::errors::StorageError;

/// Default connection protocol.
const DEFAULT_PROTOCOL: &str = "http";

/// Default storage engine hostname.
const DEFAULT_HOSTNAME: &str = "localhost";

/// Default storage engine port.
const DEFAULT_PORT: u16 = 9200;

/// Default transport request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default base name for read aliases.
const DEFAULT_ALIAS_NAME: &str = "reviews_storefront";

/// Default prefix for physical data source names.
const DEFAULT_SOURCE_PREFIX: &str = "reviews_storefront";

/// Default current data source version.
const DEFAULT_SOURCE_VERSION: u32 = 1;

/// Connection settings for the storage engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub protocol: String,
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub enable_auth: bool,
    /// Request timeout applied at the transport level, in seconds.
    pub timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            enable_auth: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConnectionSettings {
    /// Base URL of the engine node, e.g. `http://localhost:9200`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.hostname, self.port)
    }
}

/// Configuration of the storage layer: how to reach the engine and how data
/// sources and aliases are named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub connection: ConnectionSettings,
    /// Base name of the read aliases.
    pub alias_name: String,
    /// Prefix of physical data source names.
    pub source_prefix: String,
    /// Version embedded in current data source names. Bumped by the external
    /// reindex cutover, never by this layer.
    pub source_current_version: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            alias_name: DEFAULT_ALIAS_NAME.to_string(),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            source_current_version: DEFAULT_SOURCE_VERSION,
        }
    }
}

impl StorageConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REVIEWS_STORAGE_PROTOCOL`: Connection protocol (default: http)
    /// - `REVIEWS_STORAGE_HOSTNAME`: Engine hostname (default: localhost)
    /// - `REVIEWS_STORAGE_PORT`: Engine port (default: 9200)
    /// - `REVIEWS_STORAGE_USERNAME` / `REVIEWS_STORAGE_PASSWORD`: Credentials
    /// - `REVIEWS_STORAGE_AUTH_ENABLED`: "1" or "true" to enable basic auth
    /// - `REVIEWS_STORAGE_TIMEOUT_SECS`: Request timeout (default: 60)
    /// - `REVIEWS_STORAGE_ALIAS`: Read alias base name (default: reviews_storefront)
    /// - `REVIEWS_STORAGE_SOURCE_PREFIX`: Data source prefix (default: reviews_storefront)
    /// - `REVIEWS_STORAGE_SOURCE_VERSION`: Current source version (default: 1)
    ///
    /// # Returns
    ///
    /// * `Ok(StorageConfig)` - Validated configuration
    /// * `Err(StorageError)` - If the configuration is unusable
    pub fn from_env() -> Result<Self, StorageError> {
        let connection = ConnectionSettings {
            protocol: env::var("REVIEWS_STORAGE_PROTOCOL")
                .unwrap_or_else(|_| DEFAULT_PROTOCOL.to_string()),
            hostname: env::var("REVIEWS_STORAGE_HOSTNAME")
                .unwrap_or_else(|_| DEFAULT_HOSTNAME.to_string()),
            port: env::var("REVIEWS_STORAGE_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            username: env::var("REVIEWS_STORAGE_USERNAME").unwrap_or_default(),
            password: env::var("REVIEWS_STORAGE_PASSWORD").unwrap_or_default(),
            enable_auth: env::var("REVIEWS_STORAGE_AUTH_ENABLED")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true"))
                .unwrap_or(false),
            timeout_secs: env::var("REVIEWS_STORAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let config = Self {
            connection,
            alias_name: env::var("REVIEWS_STORAGE_ALIAS")
                .unwrap_or_else(|_| DEFAULT_ALIAS_NAME.to_string()),
            source_prefix: env::var("REVIEWS_STORAGE_SOURCE_PREFIX")
                .unwrap_or_else(|_| DEFAULT_SOURCE_PREFIX.to_string()),
            source_current_version: env::var("REVIEWS_STORAGE_SOURCE_VERSION")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(DEFAULT_SOURCE_VERSION),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants that make the configuration usable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the configuration can back a connection
    /// * `Err(StorageError)` - Hostname missing, or auth enabled without
    ///   complete credentials
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.connection.hostname.is_empty() {
            return Err(StorageError::configuration("storage hostname is not set"));
        }
        if self.connection.enable_auth
            && (self.connection.username.is_empty() || self.connection.password.is_empty())
        {
            return Err(StorageError::configuration(
                "storage auth is enabled but the username or password is missing",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();

        assert_eq!(config.connection.base_url(), "http://localhost:9200");
        assert!(!config.connection.enable_auth);
        assert_eq!(config.connection.timeout_secs, 60);
        assert_eq!(config.alias_name, "reviews_storefront");
        assert_eq!(config.source_prefix, "reviews_storefront");
        assert_eq!(config.source_current_version, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_hostname_fails_validation() {
        let mut config = StorageConfig::default();
        config.connection.hostname = String::new();

        let result = config.validate();

        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }

    #[test]
    fn test_auth_without_credentials_fails_validation() {
        let mut config = StorageConfig::default();
        config.connection.enable_auth = true;
        config.connection.username = "storefront".to_string();

        let result = config.validate();

        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }

    #[test]
    fn test_auth_with_credentials_passes_validation() {
        let mut config = StorageConfig::default();
        config.connection.enable_auth = true;
        config.connection.username = "storefront".to_string();
        config.connection.password = "secret".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: StorageConfig = serde_json::from_value(serde_json::json!({
            "connection": { "hostname": "search.internal", "port": 9201 },
            "source_current_version": 3,
        }))
        .unwrap();

        assert_eq!(config.connection.base_url(), "http://search.internal:9201");
        assert_eq!(config.source_current_version, 3);
        assert_eq!(config.alias_name, "reviews_storefront");
    }
}
