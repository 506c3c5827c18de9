use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;

use crate::AppState;
use crate::migrate;
use crate::models::{Category, Entry, UuidGen};

#[derive(Serialize)]
struct ExportData {
    exported_at: String,
    categories: Vec<Category>,
    entries: Vec<Entry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/export", get(export_data))
}

async fn export_data(State(state): State<AppState>) -> impl IntoResponse {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let export = ExportData {
        exported_at: chrono::Utc::now().to_rfc3339(),
        categories: journal.categories,
        entries: journal.entries,
    };

    let filename = format!("bisini-export-{}.json", chrono::Local::now().format("%Y-%m-%d"));
    let content_disposition = format!("attachment; filename=\"{}\"", filename);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&content_disposition).unwrap(),
    );

    (headers, Json(export))
}
