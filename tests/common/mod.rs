use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use bisini::models::{Category, Entry};

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let router = bisini::build_app(pool.clone());

        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(req).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    /// Write a JSON payload straight into the kv table.
    pub async fn seed_kv<T: Serialize>(&self, key: &str, value: &T) {
        self.seed_raw(key, &serde_json::to_string(value).unwrap())
            .await;
    }

    /// Write an arbitrary string payload, valid JSON or not.
    pub async fn seed_raw(&self, key: &str, payload: &str) {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(payload)
        .execute(&self.db)
        .await
        .expect("Failed to seed kv");
    }

    /// Read a kv payload back out, panicking when it is absent or unreadable.
    pub async fn kv<T: DeserializeOwned>(&self, key: &str) -> T {
        serde_json::from_str(&self.kv_raw(key).await).expect("kv payload unreadable")
    }

    pub async fn kv_raw(&self, key: &str) -> String {
        let (value,): (String,) = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_one(&self.db)
            .await
            .expect("kv key missing");
        value
    }

    /// Seed current-schema categories under the v2 key.
    pub async fn seed_categories(&self, categories: &[Category]) {
        self.seed_kv(bisini::store::CATEGORIES_KEY, &categories)
            .await;
    }

    /// Seed current-schema entries under the v2 key.
    pub async fn seed_entries(&self, entries: &[Entry]) {
        self.seed_kv(bisini::store::ENTRIES_KEY, &entries).await;
    }
}

pub fn category(id: &str, name: &str, order: i64) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        order,
    }
}

pub fn entry(id: &str, date: &str, category_id: &str, text: &str, done: bool) -> Entry {
    Entry {
        id: id.to_string(),
        date: date.parse().unwrap(),
        category_id: category_id.to_string(),
        text: text.to_string(),
        done,
    }
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert that a response is a redirect to the given location.
pub fn assert_redirect(resp: &Response, expected_location: &str) {
    assert!(
        resp.status().is_redirection(),
        "Expected redirect, got {}",
        resp.status()
    );
    let location = resp
        .headers()
        .get("location")
        .expect("Redirect should have location header")
        .to_str()
        .unwrap();
    assert_eq!(location, expected_location);
}
