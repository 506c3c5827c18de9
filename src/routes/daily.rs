use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use chrono::{Days, Local, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

use crate::AppState;
use crate::error::AppError;
use crate::migrate;
use crate::models::UuidGen;
use crate::store;

#[derive(Template)]
#[template(path = "daily.html")]
struct DailyTemplate {
    date: String,
    prev: String,
    next: String,
    rows: Vec<DayRow>,
    static_hash: &'static str,
}

struct DayRow {
    id: String,
    name: String,
    text: String,
    done: bool,
}

#[derive(Deserialize)]
pub struct DailyQuery {
    date: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/daily", get(show_day))
        .route("/daily", post(save_day))
}

async fn index() -> Redirect {
    Redirect::to("/daily")
}

fn parse_date(raw: Option<&String>) -> NaiveDate {
    raw.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive())
}

async fn show_day(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(query.date.as_ref());

    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let rows = journal
        .categories_ordered()
        .into_iter()
        .map(|c| {
            let entry = journal.entry_for(date, &c.id);
            DayRow {
                id: c.id.clone(),
                name: c.name.clone(),
                text: entry.map(|e| e.text.clone()).unwrap_or_default(),
                done: entry.is_some_and(|e| e.done),
            }
        })
        .collect();

    let template = DailyTemplate {
        date: date.to_string(),
        prev: (date - Days::new(1)).to_string(),
        next: (date + Days::new(1)).to_string(),
        rows,
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}

/// Save the whole day in one post. Per category: any text or a set done
/// flag writes the entry, an empty form row clears a previously saved one.
async fn save_day(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(form.get("date"));

    let mut ids = UuidGen;
    let mut journal = migrate::load_current(&state.db, &mut ids).await;

    let categories: Vec<String> = journal
        .categories_ordered()
        .into_iter()
        .map(|c| c.id.clone())
        .collect();

    for category_id in categories {
        let text = form
            .get(&format!("text_{category_id}"))
            .map(|t| t.trim())
            .unwrap_or_default();
        let done = form.contains_key(&format!("done_{category_id}"));

        if !text.is_empty() || done {
            match journal.upsert_entry(date, &category_id, text, done, &mut ids) {
                Ok(next) => journal = next,
                Err(e) => tracing::warn!("skipping save for category {category_id}: {e}"),
            }
        } else if journal.entry_for(date, &category_id).is_some() {
            journal = journal.remove_entry(date, &category_id);
        }
    }

    store::save_journal(&state.db, &journal).await;

    Ok(Redirect::to(&format!("/daily?date={date}")))
}
