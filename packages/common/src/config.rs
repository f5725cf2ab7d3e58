use serde::Deserialize;
use thiserror::Error;

use crate::retry::RetryPolicy;

/// Which [`NameStore`](crate::NameStore) implementation backs the registry.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory. Everything is lost on restart.
    #[default]
    Memory,
    /// Local SQLite table with a unique constraint on the normalized key.
    Sqlite,
    /// Remote record store reached over HTTP.
    Remote,
}

/// App-level storage configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Selected backend. Default: memory.
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub sqlite: SqliteConfig,
    #[serde(default)]
    pub remote: RemoteStoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SqliteConfig {
    /// SQLite connection URL. Default: "sqlite://flower_names.db?mode=rwc".
    #[serde(default = "default_sqlite_url")]
    pub url: String,
}

fn default_sqlite_url() -> String {
    "sqlite://flower_names.db?mode=rwc".into()
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: default_sqlite_url(),
        }
    }
}

/// Remote record store settings. `base_url` and `token` have no defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteStoreConfig {
    /// Base URL of the record collection, e.g. `https://records.example.com/v1/tables/flowers`.
    #[serde(default)]
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: String,
    /// Per-request timeout. Default: 30.
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
    /// Records requested per list page. Default: 100.
    #[serde(default = "default_remote_page_size")]
    pub page_size: u32,
    /// Retries for list requests on transport failure. Default: 2.
    #[serde(default = "default_remote_max_retries")]
    pub max_retries: u8,
    /// Default: 200.
    #[serde(default = "default_remote_retry_base_ms")]
    pub retry_base_ms: u64,
    /// Default: 5000.
    #[serde(default = "default_remote_retry_max_ms")]
    pub retry_max_ms: u64,
}

fn default_remote_timeout_secs() -> u64 {
    30
}
fn default_remote_page_size() -> u32 {
    100
}
fn default_remote_max_retries() -> u8 {
    2
}
fn default_remote_retry_base_ms() -> u64 {
    200
}
fn default_remote_retry_max_ms() -> u64 {
    5000
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: default_remote_timeout_secs(),
            page_size: default_remote_page_size(),
            max_retries: default_remote_max_retries(),
            retry_base_ms: default_remote_retry_base_ms(),
            retry_max_ms: default_remote_retry_max_ms(),
        }
    }
}

impl RemoteStoreConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_ms: self.retry_base_ms,
            max_ms: self.retry_max_ms,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageConfigError {
    #[error("storage.remote.base_url must be set when the remote backend is selected")]
    MissingRemoteUrl,
    #[error("storage.remote.token must be set when the remote backend is selected")]
    MissingRemoteToken,
    #[error("storage.remote.timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("storage.remote.page_size must be greater than zero")]
    ZeroPageSize,
}

impl StorageConfig {
    /// Reject configurations that would only fail later, at request time.
    ///
    /// Settings for backends other than the selected one are ignored.
    pub fn validate(&self) -> Result<(), StorageConfigError> {
        if self.backend != StorageBackend::Remote {
            return Ok(());
        }
        let remote = &self.remote;
        if remote.base_url.trim().is_empty() {
            return Err(StorageConfigError::MissingRemoteUrl);
        }
        if remote.token.trim().is_empty() {
            return Err(StorageConfigError::MissingRemoteToken);
        }
        if remote.timeout_secs == 0 {
            return Err(StorageConfigError::ZeroTimeout);
        }
        if remote.page_size == 0 {
            return Err(StorageConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
