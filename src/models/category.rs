use serde::{Deserialize, Serialize};

use super::IdGen;

/// A tracked habit or journal topic. Categories own no entries; entries
/// point back at them by id, so a rename never touches the entry records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Creation position, used for stable display ordering. Deletes leave
    /// gaps; the value is never re-packed.
    pub order: i64,
}

impl Category {
    pub fn new(ids: &mut dyn IdGen, name: String, order: i64) -> Self {
        Self {
            id: ids.next_id(),
            name,
            order,
        }
    }
}
