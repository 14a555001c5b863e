//! Shared persistence plumbing with file locking.
//!
//! Two storage disciplines, both guarded by fs2 advisory locks:
//! - JSON documents (schedule, templates, current progress) saved atomically
//!   via temp-file-and-rename
//! - JSONL append-only files (workout logs, exercise history) with tolerant
//!   per-line reads

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File layout inside the data directory
#[derive(Clone, Debug)]
pub struct StorePaths {
    data_dir: PathBuf,
}

impl StorePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn schedule_file(&self) -> PathBuf {
        self.data_dir.join("schedule.json")
    }

    pub fn templates_file(&self) -> PathBuf {
        self.data_dir.join("templates.json")
    }

    pub fn progress_file(&self) -> PathBuf {
        self.data_dir.join("current_progress.json")
    }

    pub fn logs_file(&self) -> PathBuf {
        self.data_dir.join("workout_logs.jsonl")
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join("exercise_history.jsonl")
    }
}

/// Load a JSON document with shared locking
///
/// Returns the default value if the file doesn't exist. If the file is
/// corrupted, logs a warning and returns the default rather than failing.
pub(crate) fn load_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!("No document at {:?}, using default", path);
        return Ok(T::default());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Using default.", path, e);
            return Ok(T::default());
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Using default.", path, e);
        return Ok(T::default());
    }

    let mut contents = String::new();
    let mut reader = BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {:?}: {}. Using default.", path, e);
        return Ok(T::default());
    }
    file.unlock()?;

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Using default.", path, e);
            Ok(T::default())
        }
    }
}

/// Save a JSON document atomically
///
/// Writes to a locked temp file in the same directory, syncs it, then
/// renames over the original. A failed write leaves the prior document
/// intact.
pub(crate) fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved document to {:?}", path);
    Ok(())
}

/// Append one value as a JSON line with exclusive locking
pub(crate) fn append_jsonl<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    append_all_jsonl(path, std::slice::from_ref(value))
}

/// Append a batch of values as JSON lines under a single exclusive lock
pub(crate) fn append_all_jsonl<T: Serialize>(path: &Path, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    for value in values {
        let line = serde_json::to_string(value)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    file.unlock()?;
    tracing::debug!("Appended {} lines to {:?}", values.len(), path);
    Ok(())
}

/// Read all values from a JSONL file with shared locking
///
/// Unparseable lines are skipped with a warning; a missing file reads as
/// empty.
pub(crate) fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut values = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(value) => values.push(value),
            Err(e) => {
                tracing::warn!("Failed to parse line {} of {:?}: {}", line_num + 1, path, e);
            }
        }
    }

    file.unlock()?;
    Ok(values)
}

/// Replace a JSONL file's contents atomically
///
/// Used for the one permitted mutation of append-only collections
/// (deletion by identity key).
pub(crate) fn rewrite_jsonl<T: Serialize>(path: &Path, values: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "jsonl path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for value in values {
            let line = serde_json::to_string(value)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Rewrote {:?} with {} lines", path, values.len());
    Ok(())
}
