//! Completion engine: pure logic over a day's completion state.
//!
//! Every function here takes its full context (workout definition plus
//! completion state) explicitly and performs no persistence of its own.
//! Exercise-level "done" is derived from per-set state, so there is no
//! parent/child marker to keep in sync.

use crate::{CompletionState, ExerciseDefinition, SetSlot, WorkoutDefinition};

/// Rolled-up progress for one workout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSummary {
    pub completed_sets: u32,
    pub total_sets: u32,
    pub percentage: f64,
    pub is_complete: bool,
}

/// Flip completion of one set
///
/// Out-of-range set indices (0, or past the exercise's set count) are
/// ignored with a warning rather than recorded.
pub fn toggle_set(state: &mut CompletionState, exercise: &ExerciseDefinition, set_index: u32) {
    if set_index < 1 || set_index > exercise.set_count() {
        tracing::warn!(
            "Ignoring toggle for out-of-range set {} of exercise {} ({} sets)",
            set_index,
            exercise.id,
            exercise.set_count()
        );
        return;
    }

    let slot = SetSlot::new(exercise.id.clone(), set_index);
    if state.contains(&slot) {
        state.remove(&slot);
    } else {
        state.insert(slot);
    }
}

/// Flip completion of a whole exercise
///
/// If every set is complete, all sets are uncompleted; otherwise all sets
/// are completed. This is the only operation that completes a single-set
/// exercise.
pub fn toggle_exercise(state: &mut CompletionState, exercise: &ExerciseDefinition) {
    if state.exercise_done(exercise) {
        for i in 1..=exercise.set_count() {
            state.remove(&SetSlot::new(exercise.id.clone(), i));
        }
    } else {
        for i in 1..=exercise.set_count() {
            state.insert(SetSlot::new(exercise.id.clone(), i));
        }
    }
}

/// Compute set counts, percentage, and submittability for a workout
///
/// `is_complete` gates finalization at the caller; a workout with no sets
/// is never submittable.
pub fn compute_progress(workout: &WorkoutDefinition, state: &CompletionState) -> ProgressSummary {
    let total_sets = workout.total_sets();
    let completed_sets: u32 = workout
        .exercises
        .iter()
        .map(|e| state.completed_sets_for(e))
        .sum();

    let percentage = if total_sets > 0 {
        f64::from(completed_sets) / f64::from(total_sets) * 100.0
    } else {
        0.0
    };

    ProgressSummary {
        completed_sets,
        total_sets,
        percentage,
        is_complete: completed_sets == total_sets && total_sets > 0,
    }
}

/// Merge a quick-added exercise into a workout, in memory only
///
/// The returned definition is for the active session; the stored template
/// catalog is untouched unless the user separately edits the template.
pub fn merge_quick_add(workout: &WorkoutDefinition, name: &str, sets: u32) -> WorkoutDefinition {
    let mut merged = workout.clone();
    merged.exercises.push(ExerciseDefinition {
        id: format!("{}-{}", workout.id, uuid::Uuid::new_v4()),
        name: name.to_string(),
        notes: String::new(),
        sets: sets.max(1),
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout() -> WorkoutDefinition {
        WorkoutDefinition {
            id: "test".into(),
            name: "Test".into(),
            exercises: vec![
                ExerciseDefinition {
                    id: "warmup".into(),
                    name: "Warmup".into(),
                    notes: String::new(),
                    sets: 1,
                },
                ExerciseDefinition {
                    id: "curls".into(),
                    name: "Curls".into(),
                    notes: String::new(),
                    sets: 3,
                },
            ],
        }
    }

    #[test]
    fn test_toggle_set_flips_membership() {
        let workout = workout();
        let curls = workout.exercise("curls").unwrap();
        let mut state = CompletionState::new();

        toggle_set(&mut state, curls, 2);
        assert!(state.is_set_done("curls", 2));

        toggle_set(&mut state, curls, 2);
        assert!(!state.is_set_done("curls", 2));
    }

    #[test]
    fn test_exercise_done_derived_from_sets() {
        let workout = workout();
        let curls = workout.exercise("curls").unwrap();
        let mut state = CompletionState::new();

        toggle_set(&mut state, curls, 1);
        toggle_set(&mut state, curls, 2);
        assert!(!state.exercise_done(curls));

        toggle_set(&mut state, curls, 3);
        assert!(state.exercise_done(curls));

        // Removing any set un-does the exercise
        toggle_set(&mut state, curls, 1);
        assert!(!state.exercise_done(curls));
    }

    #[test]
    fn test_toggle_exercise_completes_and_clears_all_sets() {
        let workout = workout();
        let curls = workout.exercise("curls").unwrap();
        let mut state = CompletionState::new();

        // Partial state still completes everything
        toggle_set(&mut state, curls, 2);
        toggle_exercise(&mut state, curls);
        assert!(state.exercise_done(curls));
        assert_eq!(state.completed_sets_for(curls), 3);

        toggle_exercise(&mut state, curls);
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_exercise_single_set() {
        let workout = workout();
        let warmup = workout.exercise("warmup").unwrap();
        let mut state = CompletionState::new();

        toggle_exercise(&mut state, warmup);
        assert!(state.exercise_done(warmup));

        toggle_exercise(&mut state, warmup);
        assert!(!state.exercise_done(warmup));
    }

    #[test]
    fn test_out_of_range_set_ignored() {
        let workout = workout();
        let curls = workout.exercise("curls").unwrap();
        let mut state = CompletionState::new();

        toggle_set(&mut state, curls, 0);
        toggle_set(&mut state, curls, 4);
        assert!(state.is_empty());
    }

    #[test]
    fn test_compute_progress_partial() {
        // Single-set warmup done plus 2 of 3 curls sets
        let workout = workout();
        let warmup = workout.exercise("warmup").unwrap();
        let curls = workout.exercise("curls").unwrap();
        let mut state = CompletionState::new();

        toggle_exercise(&mut state, warmup);
        toggle_set(&mut state, curls, 1);
        toggle_set(&mut state, curls, 2);

        let progress = compute_progress(&workout, &state);
        assert_eq!(progress.completed_sets, 3);
        assert_eq!(progress.total_sets, 4);
        assert!((progress.percentage - 75.0).abs() < f64::EPSILON);
        assert!(!progress.is_complete);
    }

    #[test]
    fn test_compute_progress_complete() {
        let workout = workout();
        let mut state = CompletionState::new();
        for exercise in &workout.exercises {
            toggle_exercise(&mut state, exercise);
        }

        let progress = compute_progress(&workout, &state);
        assert_eq!(progress.completed_sets, 4);
        assert!(progress.is_complete);
    }

    #[test]
    fn test_empty_workout_never_complete() {
        let rest = WorkoutDefinition {
            id: "rest".into(),
            name: "Rest Day".into(),
            exercises: vec![],
        };
        let progress = compute_progress(&rest, &CompletionState::new());
        assert_eq!(progress.total_sets, 0);
        assert_eq!(progress.percentage, 0.0);
        assert!(!progress.is_complete);
    }

    #[test]
    fn test_quick_add_is_in_memory_only() {
        let workout = workout();
        let merged = merge_quick_add(&workout, "Dips", 3);

        assert_eq!(merged.exercises.len(), workout.exercises.len() + 1);
        assert_eq!(workout.exercises.len(), 2);

        let added = merged.exercises.last().unwrap();
        assert_eq!(added.name, "Dips");
        assert_eq!(added.sets, 3);
        assert!(added.id.starts_with("test-"));
    }
}
