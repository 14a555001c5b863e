//! Session engine: toggling with persistence, template lookup, and
//! finalization of a day's session into the history log and ledger.

use crate::completion;
use crate::{
    CompletionState, Error, ExerciseHistoryRecord, ExerciseLedger, HistoryLog, ProgressStore,
    Result, Schedule, SetData, TemplateMap, WorkoutDefinition, WorkoutLog,
};
use chrono::{DateTime, NaiveDate, Utc};

/// Port for the optional cloud-sync collaborator
///
/// Injected where needed; finalize succeeds purely locally whether or not
/// a sink is present and whatever its push result is.
pub trait SyncSink {
    fn push_log(&self, log: &WorkoutLog) -> Result<()>;
}

/// Look up a workout template by id
///
/// A missing id is a lookup failure, never a silent empty workout.
pub fn template_by_id<'a>(templates: &'a TemplateMap, id: &str) -> Result<&'a WorkoutDefinition> {
    templates
        .get(id)
        .ok_or_else(|| Error::TemplateNotFound(id.to_string()))
}

/// Look up the workout scheduled for a date
pub fn template_for_day<'a>(
    templates: &'a TemplateMap,
    schedule: &Schedule,
    date: NaiveDate,
) -> Result<&'a WorkoutDefinition> {
    let id = schedule.template_for_date(date).ok_or_else(|| {
        Error::TemplateNotFound(format!("no template scheduled for {}", date))
    })?;
    template_by_id(templates, id)
}

/// Toggle one set for today and persist the result
///
/// Returns the new completion state for the caller to render.
pub fn toggle_set(
    progress: &ProgressStore,
    workout: &WorkoutDefinition,
    exercise_id: &str,
    set_index: u32,
    today: NaiveDate,
) -> Result<CompletionState> {
    let exercise = workout
        .exercise(exercise_id)
        .ok_or_else(|| Error::ExerciseNotFound(exercise_id.to_string()))?;

    let entry = progress.entry(today)?;
    let mut state = CompletionState::from_markers(
        workout,
        entry.completed_exercises.iter().map(|m| m.as_str()),
    );
    completion::toggle_set(&mut state, exercise, set_index);
    progress.put_completion(today, state.to_markers(workout))?;
    Ok(state)
}

/// Toggle a whole exercise for today and persist the result
pub fn toggle_exercise(
    progress: &ProgressStore,
    workout: &WorkoutDefinition,
    exercise_id: &str,
    today: NaiveDate,
) -> Result<CompletionState> {
    let exercise = workout
        .exercise(exercise_id)
        .ok_or_else(|| Error::ExerciseNotFound(exercise_id.to_string()))?;

    let entry = progress.entry(today)?;
    let mut state = CompletionState::from_markers(
        workout,
        entry.completed_exercises.iter().map(|m| m.as_str()),
    );
    completion::toggle_exercise(&mut state, exercise);
    progress.put_completion(today, state.to_markers(workout))?;
    Ok(state)
}

/// Finalize today's session into a permanent history entry
///
/// Snapshots the day's in-progress entry, appends a log plus the derived
/// per-set history records, clears the day's progress, and returns the
/// log. Completeness is not re-validated here: callers gate on
/// [`completion::compute_progress`], and a deliberate re-finalize ("redo
/// workout") is permitted; duplicate logs for a day are not deduplicated.
pub fn finalize(
    progress: &ProgressStore,
    history: &HistoryLog,
    ledger: &ExerciseLedger,
    workout_template_id: &str,
    completed_exercises: Vec<String>,
    today: NaiveDate,
    now: DateTime<Utc>,
    sync: Option<&dyn SyncSink>,
) -> Result<WorkoutLog> {
    let entry = progress.entry(today)?;

    let log = WorkoutLog {
        date: now,
        date_string: today,
        workout_template_id: workout_template_id.to_string(),
        completed_exercises,
        set_data: entry.set_data.clone(),
        completed_at: now,
    };

    let records = derive_history_records(&entry.set_data, now);

    history.append(&log)?;
    ledger.append_all(&records)?;
    progress.clear(today)?;

    tracing::info!(
        "Finalized {} for {}: {} set record(s)",
        workout_template_id,
        today,
        records.len()
    );

    // Fire-and-forget: a failed push never affects the local result
    if let Some(sink) = sync {
        if let Err(e) = sink.push_log(&log) {
            tracing::warn!("Sync push failed for {}: {}", log.completed_at, e);
        }
    }

    Ok(log)
}

/// Extract per-set history records from a session's inputs
///
/// Emits one record per set that recorded both a weight and a reps value;
/// incomplete pairs are skipped. Non-numeric inputs coerce to 0 rather
/// than failing the finalize call.
fn derive_history_records(set_data: &SetData, now: DateTime<Utc>) -> Vec<ExerciseHistoryRecord> {
    let mut records = Vec::new();
    for (exercise_id, set_index, entry) in set_data.iter() {
        if !entry.is_complete_pair() {
            continue;
        }
        let weight: f64 = entry
            .weight
            .as_deref()
            .and_then(|w| w.parse().ok())
            .unwrap_or(0.0);
        let reps: i64 = entry
            .reps
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(0);
        records.push(ExerciseHistoryRecord {
            exercise_id: exercise_id.to_string(),
            set_number: set_index,
            weight,
            reps,
            volume: weight * reps as f64,
            date: now,
        });
    }
    records
}
