mod common;

use axum::http::StatusCode;
use common::{TestApp, body_string, category};

use bisini::models::Category;
use bisini::store::{CATEGORIES_KEY, ENTRIES_KEY, LEGACY_CATEGORIES_KEY, LEGACY_ENTRIES_KEY};

#[tokio::test]
async fn first_load_migrates_legacy_data() {
    let app = TestApp::new().await;
    app.seed_kv(
        LEGACY_CATEGORIES_KEY,
        &vec!["reading".to_string(), "exercise".to_string()],
    )
    .await;
    app.seed_raw(
        LEGACY_ENTRIES_KEY,
        r#"[
            {"id":"e1","date":"2024-01-01","category":"reading","text":"a"},
            {"id":"e2","date":"2024-01-02","category":"guitar","text":"","done":true}
        ]"#,
    )
    .await;

    let resp = app.get("/daily").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let categories: Vec<Category> = app.kv(CATEGORIES_KEY).await;
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["reading", "exercise", "guitar"]);
    let orders: Vec<i64> = categories.iter().map(|c| c.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let mut ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let entries: serde_json::Value = app.kv(ENTRIES_KEY).await;
    assert_eq!(entries[0]["id"], "e1");
    assert_eq!(entries[0]["categoryId"], categories[0].id.as_str());
    // the migrator preserves an unresolved done flag instead of inventing one
    assert!(entries[0].get("done").is_none());
    assert_eq!(entries[1]["categoryId"], categories[2].id.as_str());
    assert_eq!(entries[1]["done"], true);
}

#[tokio::test]
async fn migration_runs_only_once() {
    let app = TestApp::new().await;
    app.seed_kv(LEGACY_CATEGORIES_KEY, &vec!["reading".to_string()])
        .await;
    app.seed_raw(
        LEGACY_ENTRIES_KEY,
        r#"[{"id":"e1","date":"2024-01-01","category":"reading","text":"a"}]"#,
    )
    .await;

    app.get("/daily").await;
    let categories_first = app.kv_raw(CATEGORIES_KEY).await;
    let entries_first = app.kv_raw(ENTRIES_KEY).await;

    app.get("/daily").await;
    assert_eq!(app.kv_raw(CATEGORIES_KEY).await, categories_first);
    assert_eq!(app.kv_raw(ENTRIES_KEY).await, entries_first);
}

#[tokio::test]
async fn existing_current_data_is_preferred_over_legacy() {
    let app = TestApp::new().await;
    app.seed_categories(&[category("c1", "kept", 0)]).await;
    app.seed_kv(LEGACY_CATEGORIES_KEY, &vec!["ignored".to_string()])
        .await;

    let resp = app.get("/categories").await;
    let html = body_string(resp).await;
    assert!(html.contains("kept"));
    assert!(!html.contains("ignored"));

    let categories: Vec<Category> = app.kv(CATEGORIES_KEY).await;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, "c1");
}

#[tokio::test]
async fn corrupt_payload_falls_back_to_empty() {
    let app = TestApp::new().await;
    app.seed_raw(ENTRIES_KEY, "{not json").await;

    let resp = app.get("/daily").await;
    assert_eq!(resp.status(), StatusCode::OK);

    // the unreadable payload was treated as absent and replaced by the
    // (empty) migration result
    let entries: serde_json::Value = app.kv(ENTRIES_KEY).await;
    assert_eq!(entries, serde_json::json!([]));
}

#[tokio::test]
async fn done_backfill_marks_entries_with_text_as_done() {
    let app = TestApp::new().await;
    app.seed_categories(&[category("c1", "Reading", 0)]).await;
    app.seed_raw(
        ENTRIES_KEY,
        r#"[{"id":"e1","date":"2024-01-15","categoryId":"c1","text":"abc"}]"#,
    )
    .await;

    let resp = app.get("/categories/c1").await;
    let html = body_string(resp).await;
    assert!(html.contains("&#10003;"));
}

#[tokio::test]
async fn done_backfill_leaves_blank_entries_unmarked() {
    let app = TestApp::new().await;
    app.seed_categories(&[category("c1", "Reading", 0)]).await;
    app.seed_raw(
        ENTRIES_KEY,
        r#"[{"id":"e1","date":"2024-01-15","categoryId":"c1","text":"   "}]"#,
    )
    .await;

    let resp = app.get("/categories/c1").await;
    let html = body_string(resp).await;
    assert!(!html.contains("&#10003;"));
}

#[tokio::test]
async fn empty_database_boots_to_an_empty_journal() {
    let app = TestApp::new().await;

    let resp = app.get("/daily").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("No categories yet"));

    // the empty current-schema collections were persisted, so later boots
    // skip the legacy keys entirely
    let categories: serde_json::Value = app.kv(CATEGORIES_KEY).await;
    assert_eq!(categories, serde_json::json!([]));
}
