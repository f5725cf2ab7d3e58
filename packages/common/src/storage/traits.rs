use async_trait::async_trait;

use super::error::StorageError;
use crate::flower::FlowerName;

/// Persistence for reserved flower names.
#[async_trait]
pub trait NameStore: Send + Sync {
    /// Short backend identifier used in logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Look up a record by its normalized key.
    async fn get_by_key(&self, normalized_key: &str) -> Result<Option<FlowerName>, StorageError>;

    /// Insert a new record.
    ///
    /// Must return [`StorageError::Conflict`] rather than overwrite when a
    /// record with the same normalized key already exists.
    async fn insert(&self, record: &FlowerName) -> Result<(), StorageError>;

    /// Return every stored record, in no particular order.
    async fn list_all(&self) -> Result<Vec<FlowerName>, StorageError>;

    /// Release backend resources. Called once on shutdown.
    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
