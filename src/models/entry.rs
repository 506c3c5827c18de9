use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::IdGen;

/// One day's journal text for one category, plus the completion flag the
/// tracker feeds on. At most one entry exists per `(date, category_id)`
/// pair; writers replace rather than merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    pub category_id: String,
    pub text: String,
    pub done: bool,
}

impl Entry {
    pub fn new(
        ids: &mut dyn IdGen,
        date: NaiveDate,
        category_id: String,
        text: String,
        done: bool,
    ) -> Self {
        Self {
            id: ids.next_id(),
            date,
            category_id,
            text,
            done,
        }
    }
}
