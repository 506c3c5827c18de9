use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::AppState;
use crate::error::AppError;
use crate::journal::Journal;
use crate::migrate;
use crate::models::UuidGen;
use crate::store;

#[derive(Template)]
#[template(path = "categories/list.html")]
struct CategoryListTemplate {
    categories: Vec<CategoryRow>,
    name: String,
    errors: HashMap<String, String>,
    static_hash: &'static str,
}

struct CategoryRow {
    id: String,
    name: String,
    count: usize,
}

#[derive(Template)]
#[template(path = "categories/form.html")]
struct CategoryFormTemplate {
    id: String,
    name: String,
    errors: HashMap<String, String>,
    static_hash: &'static str,
}

#[derive(Template)]
#[template(path = "categories/delete.html")]
struct CategoryDeleteTemplate {
    id: String,
    name: String,
    count: usize,
    others: Vec<CategoryRow>,
    static_hash: &'static str,
}

#[derive(Template)]
#[template(path = "categories/show.html")]
struct CategoryShowTemplate {
    name: String,
    entries: Vec<EntryRow>,
    static_hash: &'static str,
}

struct EntryRow {
    date: String,
    text: String,
    done: bool,
}

#[derive(Deserialize)]
pub struct CategoryForm {
    name: String,
}

#[derive(Deserialize)]
pub struct DeleteForm {
    merge_to: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{id}", get(show_category))
        .route("/categories/{id}", post(rename_category))
        .route("/categories/{id}/edit", get(edit_category_form))
        .route("/categories/{id}/delete", get(delete_category_form))
        .route("/categories/{id}/delete", post(delete_category))
}

fn category_rows(journal: &Journal) -> Vec<CategoryRow> {
    let counts = journal.entry_counts();
    journal
        .categories_ordered()
        .into_iter()
        .map(|c| CategoryRow {
            id: c.id.clone(),
            name: c.name.clone(),
            count: counts.get(c.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let template = CategoryListTemplate {
        categories: category_rows(&journal),
        name: String::new(),
        errors: HashMap::new(),
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}

async fn create_category(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    match journal.create_category(&form.name, &mut ids) {
        Ok(next) => {
            store::save_journal(&state.db, &next).await;
            Ok(Redirect::to("/categories").into_response())
        }
        Err(e) => {
            let mut errors = HashMap::new();
            errors.insert("name".to_string(), e.to_string());
            let template = CategoryListTemplate {
                categories: category_rows(&journal),
                name: form.name,
                errors,
                static_hash: crate::STATIC_HASH,
            };
            Ok(Html(template.render()?).into_response())
        }
    }
}

async fn show_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let category = journal.category(&id).ok_or(AppError::NotFound)?;

    let entries = journal
        .entries_for_category(&id)
        .into_iter()
        .map(|e| EntryRow {
            date: e.date.to_string(),
            text: e.text.clone(),
            done: e.done,
        })
        .collect();

    let template = CategoryShowTemplate {
        name: category.name.clone(),
        entries,
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}

async fn edit_category_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let category = journal.category(&id).ok_or(AppError::NotFound)?;

    let template = CategoryFormTemplate {
        id: category.id.clone(),
        name: category.name.clone(),
        errors: HashMap::new(),
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}

async fn rename_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    if journal.category(&id).is_none() {
        return Err(AppError::NotFound);
    }

    match journal.rename_category(&id, &form.name) {
        Ok(next) => {
            store::save_journal(&state.db, &next).await;
            Ok(Redirect::to("/categories").into_response())
        }
        Err(e) => {
            let mut errors = HashMap::new();
            errors.insert("name".to_string(), e.to_string());
            let template = CategoryFormTemplate {
                id,
                name: form.name,
                errors,
                static_hash: crate::STATIC_HASH,
            };
            Ok(Html(template.render()?).into_response())
        }
    }
}

async fn delete_category_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let category = journal.category(&id).ok_or(AppError::NotFound)?;

    let others = category_rows(&journal)
        .into_iter()
        .filter(|c| c.id != id)
        .collect();

    let template = CategoryDeleteTemplate {
        id: category.id.clone(),
        name: category.name.clone(),
        count: journal.entries_for_category(&id).len(),
        others,
        static_hash: crate::STATIC_HASH,
    };
    Ok(Html(template.render()?))
}

/// The confirmation form already happened; delete unconditionally, merging
/// into the selected target when one was picked.
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<impl IntoResponse, AppError> {
    let mut ids = UuidGen;
    let journal = migrate::load_current(&state.db, &mut ids).await;

    let merge_to = form.merge_to.as_deref().filter(|t| !t.is_empty());
    let next = journal.delete_category(&id, merge_to);
    store::save_journal(&state.db, &next).await;

    Ok(Redirect::to("/categories"))
}
