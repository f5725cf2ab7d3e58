use std::sync::Arc;

use async_trait::async_trait;
use common::config::{StorageBackend, StorageConfig};
use common::storage::memory::MemoryNameStore;
use common::storage::remote::RemoteNameStore;
use common::{FlowerName, NameStore, StorageError};
use sea_orm::*;
use tracing::{debug, info};

use crate::database;
use crate::entity::flower_name;

/// SQLite-backed name store. Uniqueness is enforced by the table's unique
/// index on `normalized_key`.
pub struct SqlNameStore {
    db: DatabaseConnection,
}

impl SqlNameStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let db = database::init_db(url).await.map_err(backend_error)?;
        Ok(Self::new(db))
    }
}

fn backend_error(err: DbErr) -> StorageError {
    StorageError::Backend(err.to_string())
}

#[async_trait]
impl NameStore for SqlNameStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn get_by_key(&self, normalized_key: &str) -> Result<Option<FlowerName>, StorageError> {
        let row = flower_name::Entity::find()
            .filter(flower_name::Column::NormalizedKey.eq(normalized_key))
            .one(&self.db)
            .await
            .map_err(backend_error)?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, record: &FlowerName) -> Result<(), StorageError> {
        let row = flower_name::ActiveModel {
            name: Set(record.name.clone()),
            normalized_key: Set(record.normalized_key.clone()),
            created_at: Set(record.created_at),
            ..Default::default()
        };

        row.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                debug!(key = %record.normalized_key, "Unique constraint caught on insert");
                StorageError::Conflict(record.normalized_key.clone())
            }
            _ => backend_error(e),
        })?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<FlowerName>, StorageError> {
        let rows = flower_name::Entity::find()
            .order_by_desc(flower_name::Column::CreatedAt)
            .order_by_desc(flower_name::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.db.clone().close().await.map_err(backend_error)
    }
}

/// Construct the configured name store.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn NameStore>, StorageError> {
    let store: Arc<dyn NameStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryNameStore::new()),
        StorageBackend::Sqlite => Arc::new(SqlNameStore::connect(&config.sqlite.url).await?),
        StorageBackend::Remote => Arc::new(RemoteNameStore::new(&config.remote)?),
    };
    info!(backend = store.backend(), "Name store ready");
    Ok(store)
}
