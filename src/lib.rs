pub mod cli;
pub mod db;
pub mod error;
pub mod journal;
pub mod migrate;
pub mod models;
pub mod routes;
pub mod store;
pub mod tracker;

pub const STATIC_HASH: &str = env!("STATIC_HASH");

use axum::http::{HeaderValue, header};
use axum::{Router, routing::get};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations on `pool`
/// beforehand. Legacy journal data is migrated lazily on first load, not
/// here.
pub fn build_app(pool: SqlitePool) -> Router {
    let state = AppState { db: pool };

    Router::new()
        .route("/health", get(health))
        .merge(routes::daily::router())
        .merge(routes::categories::router())
        .merge(routes::tracker::router())
        .merge(routes::export::router())
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=86400"),
                ))
                .service(ServeDir::new("static")),
        )
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
