//! Completion-history grids: per category, 52 Monday-first week columns of
//! seven booleans. A cell lights up when an entry for that category exists
//! on that exact date with `done` set. Pure derivation over a snapshot;
//! nothing here writes.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::{Category, Entry};

pub const WEEKS: usize = 52;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGrid {
    pub category_id: String,
    pub name: String,
    pub weeks: Vec<[bool; 7]>,
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Monday of the ISO week holding the earliest entry date; with no entries,
/// Monday of the ISO week one year before `today`.
pub fn week_anchor(entries: &[Entry], today: NaiveDate) -> NaiveDate {
    let base = entries
        .iter()
        .map(|e| e.date)
        .min()
        .unwrap_or_else(|| today - Days::new(365));
    monday_of(base)
}

/// One grid per category, in display order, oldest week first.
pub fn tracker_grids(
    categories: &[Category],
    entries: &[Entry],
    today: NaiveDate,
) -> Vec<CategoryGrid> {
    let anchor = week_anchor(entries, today);

    let done: HashSet<(&str, NaiveDate)> = entries
        .iter()
        .filter(|e| e.done)
        .map(|e| (e.category_id.as_str(), e.date))
        .collect();

    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by_key(|c| c.order);

    ordered
        .into_iter()
        .map(|c| {
            let mut weeks = Vec::with_capacity(WEEKS);
            for w in 0..WEEKS {
                let mut days = [false; 7];
                for (d, cell) in days.iter_mut().enumerate() {
                    let date = anchor + Days::new((w * 7 + d) as u64);
                    *cell = done.contains(&(c.id.as_str(), date));
                }
                weeks.push(days);
            }
            CategoryGrid {
                category_id: c.id.clone(),
                name: c.name.clone(),
                weeks,
            }
        })
        .collect()
}
