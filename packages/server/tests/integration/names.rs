use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

mod check {
    use super::*;

    #[tokio::test]
    async fn unknown_name_is_available() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CHECK, &json!({"name": "Rose"})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["available"], true);
        assert!(res.body["message"].is_string());
    }

    #[tokio::test]
    async fn check_add_check_round_trip() {
        let app = TestApp::spawn().await;

        let before = app.post(routes::CHECK, &json!({"name": "Rose"})).await;
        assert_eq!(before.body["available"], true);

        let add = app
            .post(routes::ADD, &json!({"name": "Rose", "password": PASSWORD}))
            .await;
        assert_eq!(add.status, 200);
        assert_eq!(add.body["success"], true);

        let after = app.post(routes::CHECK, &json!({"name": "Rose"})).await;
        assert_eq!(after.status, 200);
        assert_eq!(after.body["success"], true);
        assert_eq!(after.body["available"], false);
    }

    #[tokio::test]
    async fn check_ignores_letter_case_and_whitespace() {
        let app = TestApp::spawn().await;
        app.add_name("Camellia").await;

        let res = app.post(routes::CHECK, &json!({"name": "  CAMELLIA "})).await;

        assert_eq!(res.body["available"], false);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CHECK, &json!({"name": "   "})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "please enter a name");
    }

    #[tokio::test]
    async fn missing_name_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CHECK, &json!({})).await;

        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::CHECK, "{not json").await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod add {
    use super::*;

    #[tokio::test]
    async fn second_add_of_same_name_fails() {
        let app = TestApp::spawn().await;
        app.add_name("Peony").await;

        let res = app
            .post(routes::ADD, &json!({"name": "peony", "password": PASSWORD}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "name already exists");
        assert_eq!(app.listed_names().await, vec!["Peony"]);
    }

    #[tokio::test]
    async fn wrong_password_changes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::ADD, &json!({"name": "Lily", "password": "guess"}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "password error");
        assert!(app.listed_names().await.is_empty());
    }

    #[tokio::test]
    async fn missing_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::ADD, &json!({"name": "Lily"})).await;

        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(!app.registry.exists("lily").await.unwrap());
    }

    #[tokio::test]
    async fn unprotected_add_needs_no_password() {
        let app = TestApp::spawn_with_store(
            std::sync::Arc::new(::common::storage::memory::MemoryNameStore::new()),
            false,
        )
        .await;

        let res = app.post(routes::ADD, &json!({"name": "Lily"})).await;

        assert_eq!(res.body["success"], true);
        assert!(app.registry.exists("LILY").await.unwrap());
    }

    #[tokio::test]
    async fn display_case_is_preserved() {
        let app = TestApp::spawn().await;
        app.add_name("  Wisteria ").await;

        assert_eq!(app.listed_names().await, vec!["Wisteria"]);
    }

    #[tokio::test]
    async fn concurrent_adds_have_one_winner() {
        let app = TestApp::spawn().await;
        let body = json!({"name": "Tulip", "password": PASSWORD});

        let (a, b) = tokio::join!(app.post(routes::ADD, &body), app.post(routes::ADD, &body));

        let wins = [a, b]
            .iter()
            .filter(|r| r.body["success"] == true)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(app.listed_names().await.len(), 1);
    }
}

mod batch_add {
    use super::*;

    #[tokio::test]
    async fn case_duplicates_within_batch_are_skipped() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::BATCH_ADD,
                &json!({"password": PASSWORD, "names": ["Rose", "rose", "Lily"]}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["added"], json!(["Rose", "Lily"]));
        assert_eq!(res.body["skipped"], json!(["rose"]));
        assert_eq!(res.body["message"], "added 2, 1 already existed");
    }

    #[tokio::test]
    async fn blank_entries_are_ignored() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::BATCH_ADD,
                &json!({"password": PASSWORD, "names": ["", "  ", "Daisy"]}),
            )
            .await;

        assert_eq!(res.body["added"], json!(["Daisy"]));
        assert_eq!(res.body["skipped"], json!([]));
    }

    #[tokio::test]
    async fn empty_list_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::BATCH_ADD, &json!({"password": PASSWORD, "names": []}))
            .await;

        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "please provide a list of names");
    }

    #[tokio::test]
    async fn wrong_password_adds_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::BATCH_ADD,
                &json!({"password": "nope", "names": ["Rose", "Lily"]}),
            )
            .await;

        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "password error");
        assert!(app.listed_names().await.is_empty());
    }

    #[tokio::test]
    async fn existing_names_are_skipped() {
        let app = TestApp::spawn().await;
        app.add_name("Orchid").await;

        let res = app
            .post(
                routes::BATCH_ADD,
                &json!({"password": PASSWORD, "names": ["ORCHID", "Lotus"]}),
            )
            .await;

        assert_eq!(res.body["added"], json!(["Lotus"]));
        assert_eq!(res.body["skipped"], json!(["ORCHID"]));
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::LIST).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["names"], json!([]));
    }

    #[tokio::test]
    async fn newest_name_comes_first() {
        let app = TestApp::spawn().await;
        app.add_name("B").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        app.add_name("A").await;

        let res = app.get(routes::LIST).await;

        assert_eq!(res.body["names"][0]["name"], "A");
        assert_eq!(res.body["names"][1]["name"], "B");
        assert!(res.body["names"][0]["created_at"].is_string());
    }
}

mod service {
    use super::*;

    #[tokio::test]
    async fn landing_page_is_served() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::INDEX).await;

        assert_eq!(res.status, 200);
        assert!(res.text.contains("/api/check"));
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "ok");
        assert_eq!(res.body["backend"], "memory");
    }

    #[tokio::test]
    async fn openapi_document_lists_name_routes() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::OPENAPI).await;

        assert_eq!(res.status, 200);
        for path in ["/api/check", "/api/add", "/api/batch-add", "/api/list"] {
            assert!(
                res.body["paths"].get(path).is_some(),
                "missing {path} in OpenAPI document"
            );
        }
    }
}
