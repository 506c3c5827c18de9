use serde::Deserialize;
use sqlx::SqlitePool;
use std::fs;

use crate::migrate::{self, LegacyEntry};
use crate::models::UuidGen;
use crate::store;

/// Shape of a browser dump: the old localStorage payloads bundled into one
/// JSON object.
#[derive(Deserialize)]
struct LegacyDump {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    entries: Vec<LegacyEntry>,
}

/// One-shot import of a legacy browser dump into an empty database.
///
/// Runs the same conversion as the lazy boot-time migration and refuses to
/// overwrite a database that already holds current-schema data.
pub async fn import_dump(
    pool: &SqlitePool,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let existing_categories =
        store::load_json::<serde_json::Value>(pool, store::CATEGORIES_KEY).await;
    let existing_entries = store::load_json::<serde_json::Value>(pool, store::ENTRIES_KEY).await;
    if existing_categories.is_some() || existing_entries.is_some() {
        return Err("database already holds journal data; import only runs against an empty one"
            .to_string()
            .into());
    }

    let content = fs::read_to_string(file_path)?;
    let dump: LegacyDump = serde_json::from_str(&content)?;

    let mut ids = UuidGen;
    let (categories, entries) = migrate::migrate_legacy(&dump.categories, &dump.entries, &mut ids);

    store::save_json(pool, store::CATEGORIES_KEY, &categories).await;
    store::save_json(pool, store::ENTRIES_KEY, &entries).await;

    println!(
        "Imported {} categories and {} entries",
        categories.len(),
        entries.len()
    );

    Ok(())
}
