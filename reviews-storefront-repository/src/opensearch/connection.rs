//! Connection pool for storage engine clients.
//!
//! Clients are built lazily from static configuration and cached per pool
//! key, so independent tenants can hold separate clients while the common
//! case shares one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use opensearch::auth::Credentials;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::OpenSearch;
use tokio::sync::Mutex;
use tracing::info;
use url::Url;

use crate::config::StorageConfig;
use crate::errors::StorageError;

/// Pool key used when callers do not need tenant-separated clients.
pub const DEFAULT_POOL_KEY: &str = "default";

/// Lazily built, per-key cache of storage engine clients.
///
/// The cache lock is held across construction, so concurrent first callers
/// of one key build exactly one client between them. Construction failures
/// surface to the caller that hit them and nothing is cached, so a later
/// call retries the build.
pub struct ConnectionPool {
    config: Arc<StorageConfig>,
    clients: Mutex<HashMap<String, Arc<OpenSearch>>>,
}

impl ConnectionPool {
    pub fn new(config: Arc<StorageConfig>) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Client under the default pool key.
    pub async fn connection(&self) -> Result<Arc<OpenSearch>, StorageError> {
        self.connection_for(DEFAULT_POOL_KEY).await
    }

    /// Client under an explicit pool key, building it on first use.
    ///
    /// # Arguments
    ///
    /// * `key` - Pool key; one client is held per distinct key
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<OpenSearch>)` - Shared handle to the cached client
    /// * `Err(StorageError)` - If the client cannot be constructed from the
    ///   configured connection settings
    pub async fn connection_for(&self, key: &str) -> Result<Arc<OpenSearch>, StorageError> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(key) {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(self.build_client()?);
        clients.insert(key.to_string(), Arc::clone(&client));

        info!(
            url = %self.config.connection.base_url(),
            pool_key = %key,
            "Created storage engine client"
        );
        Ok(client)
    }

    fn build_client(&self) -> Result<OpenSearch, StorageError> {
        let connection = &self.config.connection;
        let url = Url::parse(&connection.base_url())
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(Duration::from_secs(connection.timeout_secs));
        if connection.enable_auth {
            builder = builder.auth(Credentials::Basic(
                connection.username.clone(),
                connection.password.clone(),
            ));
        }

        let transport = builder
            .build()
            .map_err(|e| StorageError::configuration(e.to_string()))?;
        Ok(OpenSearch::new(transport))
    }
}
