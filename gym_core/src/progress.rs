//! Progress store: date-scoped in-progress completion state.
//!
//! One entry per calendar day, created lazily on first mutation and
//! deleted when that day's workout is finalized. Every operation is a
//! read-modify-write of a single shared document; last writer wins.

use crate::store::{load_document, save_document, StorePaths};
use crate::{ProgressEntry, Result, SetField};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

type ProgressMap = BTreeMap<NaiveDate, ProgressEntry>;

/// Keyed, date-scoped record of not-yet-finalized completion state
#[derive(Clone, Debug)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(paths: &StorePaths) -> Self {
        Self {
            path: paths.progress_file(),
        }
    }

    /// The stored entry for a day, or a fresh empty one; absence is not
    /// an error
    pub fn entry(&self, date: NaiveDate) -> Result<ProgressEntry> {
        let map: ProgressMap = load_document(&self.path)?;
        Ok(map.get(&date).cloned().unwrap_or_default())
    }

    /// Add or remove a completion marker; idempotent
    ///
    /// Adding an already-present marker or removing an absent one is a
    /// no-op.
    pub fn set_completion(&self, date: NaiveDate, marker: &str, done: bool) -> Result<()> {
        self.update(date, |entry| {
            if done {
                if !entry.completed_exercises.iter().any(|m| m == marker) {
                    entry.completed_exercises.push(marker.to_string());
                }
            } else {
                entry.completed_exercises.retain(|m| m != marker);
            }
        })
    }

    /// Replace a day's full marker list (used by the engine's toggles)
    pub fn put_completion(&self, date: NaiveDate, markers: Vec<String>) -> Result<()> {
        self.update(date, |entry| {
            entry.completed_exercises = markers;
        })
    }

    /// Overwrite one weight/reps input; no history retained
    pub fn set_field_value(
        &self,
        date: NaiveDate,
        exercise_id: &str,
        set_index: u32,
        field: SetField,
        value: &str,
    ) -> Result<()> {
        self.update(date, |entry| {
            entry
                .set_data
                .set(exercise_id, set_index, field, value.to_string());
        })
    }

    /// Remove a day's entry entirely (post-finalization)
    pub fn clear(&self, date: NaiveDate) -> Result<()> {
        let mut map: ProgressMap = load_document(&self.path)?;
        if map.remove(&date).is_some() {
            save_document(&self.path, &map)?;
            tracing::debug!("Cleared progress for {}", date);
        }
        Ok(())
    }

    fn update<F>(&self, date: NaiveDate, f: F) -> Result<()>
    where
        F: FnOnce(&mut ProgressEntry),
    {
        let mut map: ProgressMap = load_document(&self.path)?;
        let entry = map.entry(date).or_default();
        f(entry);
        save_document(&self.path, &map)?;
        Ok(())
    }
}
