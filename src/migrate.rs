//! One-time conversion of the legacy name-keyed schema into the current
//! id-keyed schema, plus the done-flag backfill that runs on every load.
//!
//! The conversion itself is a pure function over the legacy payloads;
//! [`load_current`] wires it to storage and persists the result under the
//! current-schema keys so later boots skip it entirely.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::SqlitePool;

use crate::journal::Journal;
use crate::models::{Category, Entry, IdGen};
use crate::store;

// Old payloads carry `done` as whatever the browser happened to write:
// missing, null, or occasionally a non-boolean. Only a real JSON boolean
// survives; everything else reads as `None` and gets backfilled.
fn bool_or_none<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeBool {
        Bool(bool),
        Other(serde_json::Value),
    }

    Ok(match MaybeBool::deserialize(deserializer)? {
        MaybeBool::Bool(b) => Some(b),
        MaybeBool::Other(_) => None,
    })
}

/// Current-schema entry as it sits on disk. `done` stays optional on the
/// read side; [`backfill_done`] resolves it before the rest of the app sees
/// the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    pub id: String,
    pub date: NaiveDate,
    pub category_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "bool_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub done: Option<bool>,
}

/// Legacy-schema entry: the category is a bare name.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntry {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "bool_or_none")]
    pub done: Option<bool>,
}

/// Convert legacy payloads into current-schema records.
///
/// Category names are collected in order: the legacy category list first,
/// then any name that only appears on entries, first-seen, duplicates
/// skipped. Each name gets a fresh id and its list position as `order`.
/// Entries keep their id, date, text, and done flag and swap the name for
/// the matching id.
pub fn migrate_legacy(
    names: &[String],
    entries: &[LegacyEntry],
    ids: &mut dyn IdGen,
) -> (Vec<Category>, Vec<StoredEntry>) {
    let mut ordered: Vec<&str> = Vec::new();
    for name in names {
        if !ordered.contains(&name.as_str()) {
            ordered.push(name);
        }
    }
    for e in entries {
        if !ordered.contains(&e.category.as_str()) {
            ordered.push(&e.category);
        }
    }

    let categories: Vec<Category> = ordered
        .iter()
        .enumerate()
        .map(|(i, name)| Category::new(ids, (*name).to_string(), i as i64))
        .collect();

    let id_by_name: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.name.as_str(), c.id.as_str()))
        .collect();

    let migrated = entries
        .iter()
        .filter_map(|e| match id_by_name.get(e.category.as_str()) {
            Some(id) => Some(StoredEntry {
                id: e.id.clone(),
                date: e.date,
                category_id: (*id).to_string(),
                text: e.text.clone(),
                done: e.done,
            }),
            None => {
                tracing::warn!("dropping entry {} with unmapped category", e.id);
                None
            }
        })
        .collect();

    (categories, migrated)
}

/// Resolve missing done flags: an entry without a boolean `done` counts as
/// done exactly when its trimmed text is non-empty. Applied in memory on
/// every load; the resolved value reaches disk with the next save.
pub fn backfill_done(stored: Vec<StoredEntry>) -> Vec<Entry> {
    stored
        .into_iter()
        .map(|e| {
            let done = e.done.unwrap_or(!e.text.trim().is_empty());
            Entry {
                id: e.id,
                date: e.date,
                category_id: e.category_id,
                text: e.text,
                done,
            }
        })
        .collect()
}

/// Load the journal, migrating legacy data the first time around.
///
/// Current-schema data wins: if either current key holds a readable
/// payload, it is returned as-is (modulo the done backfill) and storage is
/// left alone. Only when both are absent are the legacy keys read,
/// converted, and persisted under the current keys, which makes the whole
/// routine idempotent across boots.
pub async fn load_current(pool: &SqlitePool, ids: &mut (dyn IdGen + Send)) -> Journal {
    let categories = store::load_json::<Vec<Category>>(pool, store::CATEGORIES_KEY).await;
    let stored = store::load_json::<Vec<StoredEntry>>(pool, store::ENTRIES_KEY).await;
    if categories.is_some() || stored.is_some() {
        return Journal::new(
            categories.unwrap_or_default(),
            backfill_done(stored.unwrap_or_default()),
        );
    }

    let names = store::load_json::<Vec<String>>(pool, store::LEGACY_CATEGORIES_KEY)
        .await
        .unwrap_or_default();
    let legacy = store::load_json::<Vec<LegacyEntry>>(pool, store::LEGACY_ENTRIES_KEY)
        .await
        .unwrap_or_default();

    let (categories, stored) = migrate_legacy(&names, &legacy, ids);
    if !categories.is_empty() {
        tracing::info!(
            categories = categories.len(),
            entries = stored.len(),
            "migrated legacy journal data"
        );
    }

    store::save_json(pool, store::CATEGORIES_KEY, &categories).await;
    store::save_json(pool, store::ENTRIES_KEY, &stored).await;

    Journal::new(categories, backfill_done(stored))
}
