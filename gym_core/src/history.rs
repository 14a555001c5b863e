//! History log: append-only collection of finalized workout sessions.
//!
//! Logs are appended as JSON lines in insertion order; consumers sort by
//! `date` descending for display. The only permitted mutation is deletion
//! by `completed_at`, which rewrites the file atomically.

use crate::store::{append_jsonl, read_jsonl, rewrite_jsonl, StorePaths};
use crate::{Result, WorkoutLog};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;

/// Append-only store of finalized sessions
#[derive(Clone, Debug)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(paths: &StorePaths) -> Self {
        Self {
            path: paths.logs_file(),
        }
    }

    /// Append a finalized session
    pub fn append(&self, log: &WorkoutLog) -> Result<()> {
        append_jsonl(&self.path, log)?;
        tracing::debug!(
            "Logged workout {} completed at {}",
            log.workout_template_id,
            log.completed_at
        );
        Ok(())
    }

    /// All logs in insertion order
    pub fn load(&self) -> Result<Vec<WorkoutLog>> {
        read_jsonl(&self.path)
    }

    /// All logs sorted by `date`, newest first (display order)
    pub fn load_sorted(&self) -> Result<Vec<WorkoutLog>> {
        let mut logs = self.load()?;
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }

    /// Logs finalized on a specific calendar day
    pub fn logs_for(&self, date: NaiveDate) -> Result<Vec<WorkoutLog>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|log| log.date_string == date)
            .collect())
    }

    /// Whether a day already has a log, optionally for a specific template
    ///
    /// Used to gate re-entry into a finished workout.
    pub fn completed_on(&self, date: NaiveDate, template_id: Option<&str>) -> Result<bool> {
        Ok(self.load()?.iter().any(|log| {
            log.date_string == date
                && template_id.map_or(true, |id| log.workout_template_id == id)
        }))
    }

    /// Delete a log by its `completed_at` identity key
    ///
    /// Returns the number of logs removed (duplicate finalize can produce
    /// several logs per day, but `completed_at` is unique per log).
    pub fn delete(&self, completed_at: DateTime<Utc>) -> Result<usize> {
        let logs = self.load()?;
        let before = logs.len();
        let kept: Vec<WorkoutLog> = logs
            .into_iter()
            .filter(|log| log.completed_at != completed_at)
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            rewrite_jsonl(&self.path, &kept)?;
            tracing::info!("Deleted {} log(s) completed at {}", removed, completed_at);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetData;
    use chrono::TimeZone;

    fn make_log(template: &str, day: NaiveDate, hour: u32) -> WorkoutLog {
        let date = day.and_hms_opt(hour, 0, 0).unwrap().and_utc();
        WorkoutLog {
            date,
            date_string: day,
            workout_template_id: template.into(),
            completed_exercises: vec!["legs-1".into()],
            set_data: SetData::new(),
            completed_at: date,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn history(temp_dir: &tempfile::TempDir) -> HistoryLog {
        HistoryLog::new(&StorePaths::new(temp_dir.path()))
    }

    #[test]
    fn test_append_and_load_preserves_insertion_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let history = history(&temp_dir);

        history.append(&make_log("legs", day(9), 8)).unwrap();
        history.append(&make_log("shoulders", day(10), 8)).unwrap();

        let logs = history.load().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].workout_template_id, "legs");
        assert_eq!(logs[1].workout_template_id, "shoulders");
    }

    #[test]
    fn test_load_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let history = history(&temp_dir);

        history.append(&make_log("legs", day(8), 8)).unwrap();
        history.append(&make_log("shoulders", day(10), 8)).unwrap();
        history.append(&make_log("chest", day(9), 8)).unwrap();

        let logs = history.load_sorted().unwrap();
        assert_eq!(logs[0].workout_template_id, "shoulders");
        assert_eq!(logs[2].workout_template_id, "legs");
    }

    #[test]
    fn test_completed_on_with_and_without_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let history = history(&temp_dir);

        history.append(&make_log("legs", day(10), 8)).unwrap();

        assert!(history.completed_on(day(10), None).unwrap());
        assert!(history.completed_on(day(10), Some("legs")).unwrap());
        assert!(!history.completed_on(day(10), Some("shoulders")).unwrap());
        assert!(!history.completed_on(day(11), None).unwrap());
    }

    #[test]
    fn test_duplicate_logs_for_a_day_are_permitted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let history = history(&temp_dir);

        history.append(&make_log("legs", day(10), 8)).unwrap();
        history.append(&make_log("legs", day(10), 18)).unwrap();

        assert_eq!(history.logs_for(day(10)).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_by_completed_at() {
        let temp_dir = tempfile::tempdir().unwrap();
        let history = history(&temp_dir);

        let keep = make_log("legs", day(10), 8);
        let drop = make_log("legs", day(10), 18);
        history.append(&keep).unwrap();
        history.append(&drop).unwrap();

        let removed = history.delete(drop.completed_at).unwrap();
        assert_eq!(removed, 1);

        let logs = history.load().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].completed_at, keep.completed_at);
    }

    #[test]
    fn test_delete_unknown_key_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let history = history(&temp_dir);

        history.append(&make_log("legs", day(10), 8)).unwrap();
        let removed = history
            .delete(Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap())
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(history.load().unwrap().len(), 1);
    }
}
