//! Backup export/import and CSV export of the exercise ledger.
//!
//! Backups are a single JSON document bundling the schedule, the template
//! map, and every finalized log. Import is all-or-nothing: the document is
//! validated in full before any store is touched.

use crate::catalog;
use crate::store::{rewrite_jsonl, StorePaths};
use crate::{Error, ExerciseLedger, HistoryLog, Result, Schedule, TemplateMap, WorkoutLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// A full backup of the user's data
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub schedule: Schedule,
    pub templates: TemplateMap,
    pub logs: Vec<WorkoutLog>,
    pub export_date: DateTime<Utc>,
}

/// Bundle the current schedule, templates, and logs into a backup file
pub fn export_backup(paths: &StorePaths, out_path: &Path, now: DateTime<Utc>) -> Result<()> {
    let backup = BackupDocument {
        schedule: catalog::load_schedule(paths)?,
        templates: catalog::load_templates(paths)?,
        logs: HistoryLog::new(paths).load()?,
        export_date: now,
    };

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(out_path)?;
    serde_json::to_writer_pretty(file, &backup)?;

    tracing::info!(
        "Exported backup with {} log(s) to {:?}",
        backup.logs.len(),
        out_path
    );
    Ok(())
}

/// Restore schedule, templates, and logs from a backup file
///
/// The document must carry all three sections; a backup missing any of
/// them is rejected before any store is written. The current progress
/// entry and exercise ledger are left untouched.
pub fn import_backup(paths: &StorePaths, in_path: &Path) -> Result<BackupDocument> {
    let contents = std::fs::read_to_string(in_path)?;

    // Check structure before committing to the typed parse, so a missing
    // section reports as an invalid backup rather than a decode error
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidBackup(format!("not valid JSON: {}", e)))?;
    for section in ["schedule", "templates", "logs"] {
        if value.get(section).is_none() {
            return Err(Error::InvalidBackup(format!(
                "missing '{}' section",
                section
            )));
        }
    }

    let backup: BackupDocument = serde_json::from_value(value)
        .map_err(|e| Error::InvalidBackup(format!("malformed backup: {}", e)))?;

    catalog::save_schedule(paths, &backup.schedule)?;
    catalog::save_templates(paths, &backup.templates)?;
    rewrite_jsonl(&paths.logs_file(), &backup.logs)?;

    tracing::info!(
        "Imported backup with {} template(s) and {} log(s)",
        backup.templates.len(),
        backup.logs.len()
    );
    Ok(backup)
}

/// A row in the ledger CSV export
#[derive(Debug, Serialize)]
struct CsvRow {
    exercise_id: String,
    set_number: u32,
    weight: f64,
    reps: i64,
    volume: f64,
    date: String,
}

/// Export the exercise ledger as CSV, newest records last
pub fn export_history_csv(paths: &StorePaths, out_path: &Path) -> Result<usize> {
    let records = ExerciseLedger::new(paths).load()?;

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(out_path)?;
    let mut writer = csv::Writer::from_writer(file);

    for record in &records {
        writer.serialize(CsvRow {
            exercise_id: record.exercise_id.clone(),
            set_number: record.set_number,
            weight: record.weight,
            reps: record.reps,
            volume: record.volume,
            date: record.date.to_rfc3339(),
        })?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} ledger records to {:?}", records.len(), out_path);
    Ok(records.len())
}
