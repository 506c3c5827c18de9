//! Typed load/save against the `kv` table.
//!
//! Each key holds one JSON document. Reads fall back to `None` when the key
//! is absent, the query fails, or the payload is unreadable; writes are
//! best-effort and never surface an error to the caller. The in-memory
//! snapshot stays the source of truth for the session either way.

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

use crate::journal::Journal;

/// Current-schema keys. Kept byte-compatible with the browser app's
/// localStorage keys so exported dumps line up.
pub const CATEGORIES_KEY: &str = "bisini_categories_v2";
pub const ENTRIES_KEY: &str = "bisini_entries_v2";

/// Legacy-schema keys: a bare name list plus entries that reference
/// categories by name.
pub const LEGACY_CATEGORIES_KEY: &str = "bisini_categories_v1";
pub const LEGACY_ENTRIES_KEY: &str = "bisini_entries_v1";

pub async fn load_json<T: DeserializeOwned>(pool: &SqlitePool, key: &str) -> Option<T> {
    let row: Option<(String,)> = match sqlx::query_as("SELECT value FROM kv WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => row,
        Err(e) => {
            tracing::warn!("kv read failed for {key}: {e}");
            return None;
        }
    };

    let (payload,) = row?;
    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("discarding unreadable payload at {key}: {e}");
            None
        }
    }
}

pub async fn save_json<T: Serialize>(pool: &SqlitePool, key: &str, value: &T) {
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("failed to serialize payload for {key}: {e}");
            return;
        }
    };

    let result = sqlx::query(
        "INSERT INTO kv (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(&payload)
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::warn!("kv write failed for {key}: {e}");
    }
}

/// Persist both halves of a snapshot under the current-schema keys.
pub async fn save_journal(pool: &SqlitePool, journal: &Journal) {
    save_json(pool, CATEGORIES_KEY, &journal.categories).await;
    save_json(pool, ENTRIES_KEY, &journal.entries).await;
}
