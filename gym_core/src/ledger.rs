//! Exercise history ledger: append-only per-set performance records.
//!
//! Records are extracted from finalized sessions and drive
//! progressive-overload lookups.

use crate::store::{append_all_jsonl, read_jsonl, StorePaths};
use crate::{ExerciseHistoryRecord, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Most recent recorded performance for an exercise
#[derive(Clone, Debug, PartialEq)]
pub struct LastSession {
    pub weight: f64,
    pub reps: i64,
    pub date: DateTime<Utc>,
}

/// Append-only store of per-set performance records
#[derive(Clone, Debug)]
pub struct ExerciseLedger {
    path: PathBuf,
}

impl ExerciseLedger {
    pub fn new(paths: &StorePaths) -> Self {
        Self {
            path: paths.history_file(),
        }
    }

    /// Append a batch of records under one lock
    pub fn append_all(&self, records: &[ExerciseHistoryRecord]) -> Result<()> {
        append_all_jsonl(&self.path, records)
    }

    /// All records in append order
    pub fn load(&self) -> Result<Vec<ExerciseHistoryRecord>> {
        read_jsonl(&self.path)
    }

    /// Records for one exercise, in append order
    pub fn records_for(&self, exercise_id: &str) -> Result<Vec<ExerciseHistoryRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.exercise_id == exercise_id)
            .collect())
    }

    /// The record with the maximum date for an exercise
    ///
    /// When timestamps tie, the most recently appended record wins.
    pub fn last_session(&self, exercise_id: &str) -> Result<Option<LastSession>> {
        let mut best: Option<ExerciseHistoryRecord> = None;
        for record in self.records_for(exercise_id)? {
            match &best {
                Some(current) if record.date < current.date => {}
                _ => best = Some(record),
            }
        }
        Ok(best.map(|r| LastSession {
            weight: r.weight,
            reps: r.reps,
            date: r.date,
        }))
    }
}
