use std::sync::Arc;

use ::common::{FlowerName, NameStore, StorageError};
use async_trait::async_trait;
use serde_json::json;
use server::storage::SqlNameStore;

use crate::common::{PASSWORD, TestApp, routes};

/// Store whose backend is unreachable.
struct DownStore;

#[async_trait]
impl NameStore for DownStore {
    fn backend(&self) -> &'static str {
        "down"
    }

    async fn get_by_key(&self, _key: &str) -> Result<Option<FlowerName>, StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }

    async fn insert(&self, _record: &FlowerName) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }

    async fn list_all(&self) -> Result<Vec<FlowerName>, StorageError> {
        Err(StorageError::Malformed("unexpected end of input".into()))
    }
}

mod storage_outage {
    use super::*;

    #[tokio::test]
    async fn check_does_not_report_available() {
        let app = TestApp::spawn_with_store(Arc::new(DownStore), true).await;

        let res = app.post(routes::CHECK, &json!({"name": "Rose"})).await;

        assert_eq!(res.status, 503);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "STORAGE_UNAVAILABLE");
        assert!(res.body.get("available").is_none());
    }

    #[tokio::test]
    async fn add_reports_unavailable() {
        let app = TestApp::spawn_with_store(Arc::new(DownStore), true).await;

        let res = app
            .post(routes::ADD, &json!({"name": "Rose", "password": PASSWORD}))
            .await;

        assert_eq!(res.status, 503);
        assert_eq!(res.body["code"], "STORAGE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn validation_happens_before_storage_access() {
        let app = TestApp::spawn_with_store(Arc::new(DownStore), true).await;

        let res = app.post(routes::CHECK, &json!({"name": ""})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_listing_reports_unavailable() {
        let app = TestApp::spawn_with_store(Arc::new(DownStore), true).await;

        let res = app.get(routes::LIST).await;

        assert_eq!(res.status, 503);
        assert_eq!(res.body["success"], false);
    }
}

mod sqlite_backend {
    use super::*;

    async fn spawn_sqlite() -> (TestApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("flower_names.db").display()
        );
        let store = SqlNameStore::connect(&url)
            .await
            .expect("Failed to open SQLite store");
        (TestApp::spawn_with_store(Arc::new(store), true).await, dir)
    }

    #[tokio::test]
    async fn end_to_end_with_sqlite() {
        let (app, _dir) = spawn_sqlite().await;

        let res = app
            .post(
                routes::BATCH_ADD,
                &json!({"password": PASSWORD, "names": ["Rose", "rose", "Lily"]}),
            )
            .await;
        assert_eq!(res.body["added"], json!(["Rose", "Lily"]));
        assert_eq!(res.body["skipped"], json!(["rose"]));

        let check = app.post(routes::CHECK, &json!({"name": "LILY"})).await;
        assert_eq!(check.body["available"], false);

        let mut names = app.listed_names().await;
        names.sort();
        assert_eq!(names, vec!["Lily", "Rose"]);
    }

    #[tokio::test]
    async fn sqlite_rejects_duplicate_add() {
        let (app, _dir) = spawn_sqlite().await;
        app.add_name("Magnolia").await;

        let res = app
            .post(routes::ADD, &json!({"name": "MAGNOLIA", "password": PASSWORD}))
            .await;

        assert_eq!(res.body["success"], false);
        assert_eq!(app.listed_names().await.len(), 1);
    }
}
