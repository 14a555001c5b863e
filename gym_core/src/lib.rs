#![forbid(unsafe_code)]

//! Core domain model and business logic for the GymTick tracker.
//!
//! This crate provides:
//! - Domain types (templates, exercises, completion state, logs)
//! - Template catalog and weekly schedule
//! - Completion toggling and progress rollup
//! - Persistence (progress document, history log, exercise ledger)
//! - Session finalization and analytics

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod completion;
pub mod progress;
pub mod history;
pub mod ledger;
pub mod engine;
pub mod analytics;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::get_default_templates;
pub use config::Config;
pub use store::StorePaths;
pub use completion::{compute_progress, ProgressSummary};
pub use progress::ProgressStore;
pub use history::HistoryLog;
pub use ledger::{ExerciseLedger, LastSession};
pub use engine::{finalize, SyncSink};
pub use analytics::{quick_stats, suggest_progression, ProgressionSuggestion, QuickStats};
pub use export::{export_backup, export_history_csv, import_backup, BackupDocument};
