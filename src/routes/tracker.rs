use askama::Template;
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use chrono::Local;

use crate::AppState;
use crate::error::AppError;
use crate::migrate;
use crate::models::UuidGen;
use crate::tracker;

#[derive(Template)]
#[template(path = "tracker.html")]
struct TrackerTemplate {
    habits: Vec<HabitView>,
    static_hash: &'static str,
}

struct HabitView {
    name: String,
    weeks: Vec<Vec<&'static str>>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tracker", get(show_tracker))
}

async fn show_tracker(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let grids = tracker::tracker_grids(
        &journal.categories,
        &journal.entries,
        Local::now().date_naive(),
    );

    let habits = grids
        .into_iter()
        .map(|grid| HabitView {
            name: grid.name,
            weeks: grid
                .weeks
                .into_iter()
                .map(|week| {
                    week.iter()
                        .map(|&done| if done { "cell on" } else { "cell" })
                        .collect()
                })
                .collect(),
        })
        .collect();

    let template = TrackerTemplate {
        habits,
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}
