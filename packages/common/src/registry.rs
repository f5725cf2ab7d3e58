use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::flower::{FlowerName, normalize_key, sort_newest_first};
use crate::storage::{NameStore, StorageError};

/// Result of a batch reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Names reserved by this batch, in input order (trimmed).
    pub added: Vec<String>,
    /// Names that were already taken, including repeats within the batch.
    pub skipped: Vec<String>,
}

/// A batch stopped part-way because the store failed.
///
/// Names in `partial.added` were committed before the failure and stay
/// reserved.
#[derive(Debug, Error)]
#[error("batch interrupted after {} name(s) were added: {source}", .partial.added.len())]
pub struct BatchInterrupted {
    pub partial: BatchOutcome,
    #[source]
    pub source: StorageError,
}

/// Case-insensitive registry of reserved flower names.
pub struct NameRegistry {
    store: Arc<dyn NameStore>,
}

impl NameRegistry {
    pub fn new(store: Arc<dyn NameStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Whether `name` (in any letter case) is already reserved.
    #[instrument(skip(self))]
    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let key = normalize_key(name);
        Ok(self.store.get_by_key(&key).await?.is_some())
    }

    /// Reserve `name`.
    ///
    /// Returns `Ok(false)` when the name is already taken; that is an expected
    /// outcome, not an error.
    #[instrument(skip(self))]
    pub async fn add(&self, name: &str) -> Result<bool, StorageError> {
        let record = FlowerName::new(name);

        if self.store.get_by_key(&record.normalized_key).await?.is_some() {
            debug!(key = %record.normalized_key, "Name already reserved");
            return Ok(false);
        }

        match self.store.insert(&record).await {
            Ok(()) => Ok(true),
            Err(StorageError::Conflict(key)) => {
                debug!(%key, "Lost insert race, name already reserved");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Reserve every non-blank name in `names`, in order.
    ///
    /// Blank entries are dropped silently. Each insertion is visible to the
    /// checks that follow it, so repeats within the batch are skipped.
    #[instrument(skip(self, names), fields(count = names.len()))]
    pub async fn batch_add<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BatchOutcome, BatchInterrupted> {
        let mut outcome = BatchOutcome::default();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.add(name).await {
                Ok(true) => outcome.added.push(name.to_string()),
                Ok(false) => outcome.skipped.push(name.to_string()),
                Err(source) => {
                    return Err(BatchInterrupted {
                        partial: outcome,
                        source,
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// All reserved names, newest first.
    pub async fn list_all(&self) -> Result<Vec<FlowerName>, StorageError> {
        let mut names = self.store.list_all().await?;
        sort_newest_first(&mut names);
        Ok(names)
    }

    /// Release the underlying store.
    pub async fn close(&self) -> Result<(), StorageError> {
        self.store.close().await
    }
}
