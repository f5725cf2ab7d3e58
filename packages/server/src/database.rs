use std::time::Duration;

use sea_orm::sea_query::{Index, SqliteQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::flower_name;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // An in-memory SQLite database exists per connection, so the pool must
    // never open a second one or recycle the first.
    if db_url.contains(":memory:") || db_url.contains("mode=memory") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(8)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300));
    }
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await?;

    Ok(db)
}

/// Ensure the indexes the name store relies on exist.
///
/// The unique index backs the uniqueness guarantee even if the table was
/// created before the column carried a unique constraint.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let unique_key = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_flower_name_normalized_key")
        .table(flower_name::Entity)
        .col(flower_name::Column::NormalizedKey)
        .to_string(SqliteQueryBuilder);
    db.execute_unprepared(&unique_key).await?;

    // Listing is always newest first.
    let created = Index::create()
        .if_not_exists()
        .name("idx_flower_name_created_at")
        .table(flower_name::Entity)
        .col(flower_name::Column::CreatedAt)
        .to_string(SqliteQueryBuilder);

    match db.execute_unprepared(&created).await {
        Ok(_) => info!("Ensured index idx_flower_name_created_at exists"),
        Err(e) => warn!("Failed to create index idx_flower_name_created_at: {}", e),
    }

    Ok(())
}
