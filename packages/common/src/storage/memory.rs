use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::error::StorageError;
use super::traits::NameStore;
use crate::flower::FlowerName;

/// Process-local name store.
///
/// Records live only as long as the process. Check-and-insert runs under the
/// map's shard lock for the key, so two concurrent inserts of the same key
/// cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryNameStore {
    names: DashMap<String, (u64, FlowerName)>,
    seq: AtomicU64,
}

impl MemoryNameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[async_trait]
impl NameStore for MemoryNameStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_by_key(&self, normalized_key: &str) -> Result<Option<FlowerName>, StorageError> {
        Ok(self
            .names
            .get(normalized_key)
            .map(|entry| entry.value().1.clone()))
    }

    async fn insert(&self, record: &FlowerName) -> Result<(), StorageError> {
        match self.names.entry(record.normalized_key.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(record.normalized_key.clone())),
            Entry::Vacant(slot) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                slot.insert((seq, record.clone()));
                Ok(())
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<FlowerName>, StorageError> {
        let mut rows: Vec<(u64, FlowerName)> = self
            .names
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first; the insertion sequence settles equal timestamps.
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, record)| record).collect())
    }
}
