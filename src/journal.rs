//! The in-memory journal snapshot: the category list and the entry list.
//!
//! Every mutator takes `&self` and returns a fresh `Journal`; the previous
//! snapshot is never touched. Callers persist whichever snapshot they decide
//! to keep. Invariants maintained here: category names are unique among live
//! categories (exact, case-sensitive), at most one entry exists per
//! `(date, category_id)` pair, and mutators never create an entry pointing
//! at a category that is not live.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Category, Entry, IdGen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    EmptyName,
    DuplicateName(String),
    UnknownCategory(String),
}

impl std::fmt::Display for JournalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalError::EmptyName => write!(f, "Name is required"),
            JournalError::DuplicateName(name) => {
                write!(f, "A category named '{name}' already exists")
            }
            JournalError::UnknownCategory(id) => write!(f, "Unknown category: {id}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    pub categories: Vec<Category>,
    pub entries: Vec<Entry>,
}

impl Journal {
    pub fn new(categories: Vec<Category>, entries: Vec<Entry>) -> Self {
        Self {
            categories,
            entries,
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Categories in display order.
    pub fn categories_ordered(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.order);
        categories
    }

    pub fn entry_for(&self, date: NaiveDate, category_id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.date == date && e.category_id == category_id)
    }

    /// Entries for one category, newest first. Scoped by a live category id,
    /// so entries left dangling by outside interference never show up in
    /// category views.
    pub fn entries_for_category(&self, category_id: &str) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| e.category_id == category_id)
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// Entry count per category id.
    pub fn entry_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for e in &self.entries {
            *counts.entry(e.category_id.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Add a category. The name is trimmed; an empty or already-taken name
    /// is rejected without touching the snapshot.
    pub fn create_category(
        &self,
        name: &str,
        ids: &mut dyn IdGen,
    ) -> Result<Journal, JournalError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JournalError::EmptyName);
        }
        if self.categories.iter().any(|c| c.name == name) {
            return Err(JournalError::DuplicateName(name.to_string()));
        }

        let mut next = self.clone();
        let order = next.categories.len() as i64;
        next.categories
            .push(Category::new(ids, name.to_string(), order));
        Ok(next)
    }

    /// Rename a category. Ids are stable, so entries need no rewrite. A name
    /// held by a different category is rejected; renaming an id that is not
    /// live leaves the snapshot unchanged.
    pub fn rename_category(&self, id: &str, new_name: &str) -> Result<Journal, JournalError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(JournalError::EmptyName);
        }
        if self
            .categories
            .iter()
            .any(|c| c.id != id && c.name == new_name)
        {
            return Err(JournalError::DuplicateName(new_name.to_string()));
        }

        let mut next = self.clone();
        if let Some(category) = next.categories.iter_mut().find(|c| c.id == id) {
            category.name = new_name.to_string();
        }
        Ok(next)
    }

    /// Remove a category. Without a merge target (or with the target equal
    /// to the deleted id, or pointing at a category that is not live) its
    /// entries are dropped outright. With a live target, source entries are
    /// folded in date by date: a date the target has no entry on re-homes
    /// the source entry as-is, a date both have an entry on merges the two
    /// into the target's entry (texts joined by a newline when both are
    /// non-empty, done flags OR-ed, target's id and date kept).
    pub fn delete_category(&self, id: &str, merge_to: Option<&str>) -> Journal {
        let categories: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();

        let target = merge_to
            .filter(|t| *t != id)
            .and_then(|t| categories.iter().find(|c| c.id == t))
            .map(|c| c.id.clone());

        let Some(target) = target else {
            if merge_to.is_some_and(|t| t != id) {
                tracing::warn!("merge target is not a live category, deleting entries instead");
            }
            let entries = self
                .entries
                .iter()
                .filter(|e| e.category_id != id)
                .cloned()
                .collect();
            return Journal { categories, entries };
        };

        let mut entries: Vec<Entry> = Vec::with_capacity(self.entries.len());
        let mut target_by_date: HashMap<NaiveDate, usize> = HashMap::new();
        for e in &self.entries {
            if e.category_id == id {
                continue;
            }
            if e.category_id == target {
                target_by_date.insert(e.date, entries.len());
            }
            entries.push(e.clone());
        }

        for source in self.entries.iter().filter(|e| e.category_id == id) {
            match target_by_date.get(&source.date) {
                Some(&i) => {
                    let t = &mut entries[i];
                    t.text = join_texts(&t.text, &source.text);
                    t.done = t.done || source.done;
                }
                None => {
                    let mut moved = source.clone();
                    moved.category_id = target.clone();
                    target_by_date.insert(moved.date, entries.len());
                    entries.push(moved);
                }
            }
        }

        Journal { categories, entries }
    }

    /// Replace-on-write for the `(date, category_id)` pair: any existing
    /// entry for the pair is dropped and a new one with a fresh id takes its
    /// place. Writing against a category that is not live is rejected.
    pub fn upsert_entry(
        &self,
        date: NaiveDate,
        category_id: &str,
        text: &str,
        done: bool,
        ids: &mut dyn IdGen,
    ) -> Result<Journal, JournalError> {
        if self.category(category_id).is_none() {
            return Err(JournalError::UnknownCategory(category_id.to_string()));
        }

        let mut entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| !(e.date == date && e.category_id == category_id))
            .cloned()
            .collect();
        entries.insert(
            0,
            Entry::new(ids, date, category_id.to_string(), text.to_string(), done),
        );
        Ok(Journal {
            categories: self.categories.clone(),
            entries,
        })
    }

    /// Drop the entry for the pair if one exists; otherwise a no-op.
    pub fn remove_entry(&self, date: NaiveDate, category_id: &str) -> Journal {
        let entries = self
            .entries
            .iter()
            .filter(|e| !(e.date == date && e.category_id == category_id))
            .cloned()
            .collect();
        Journal {
            categories: self.categories.clone(),
            entries,
        }
    }
}

fn join_texts(target: &str, source: &str) -> String {
    match (target.is_empty(), source.is_empty()) {
        (false, false) => format!("{target}\n{source}"),
        (true, false) => source.to_string(),
        (_, true) => target.to_string(),
    }
}
