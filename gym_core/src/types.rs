//! Core domain types for the GymTick state engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout and exercise definitions
//! - Completion state (per-set, single source of truth)
//! - Per-set numeric inputs (weight/reps)
//! - Finalized workout logs and per-set history records
//! - The weekly schedule

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Workout Definition Types
// ============================================================================

/// A single exercise within a workout template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_sets")]
    pub sets: u32,
}

fn default_sets() -> u32 {
    1
}

impl ExerciseDefinition {
    /// Effective set count (a stored `sets` of 0 still counts as one set)
    pub fn set_count(&self) -> u32 {
        self.sets.max(1)
    }
}

/// A workout template: an ordered list of exercises
///
/// Immutable during a session; edited only through the template catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutDefinition {
    pub id: String,
    pub name: String,
    pub exercises: Vec<ExerciseDefinition>,
}

impl WorkoutDefinition {
    /// Look up an exercise by id
    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    /// Total number of sets across all exercises
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.set_count()).sum()
    }

    /// A template with no exercises is a rest day
    pub fn is_rest(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Mapping from template id to workout definition
pub type TemplateMap = BTreeMap<String, WorkoutDefinition>;

// ============================================================================
// Completion State
// ============================================================================

/// Structured key for one set of one exercise (1-indexed)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetSlot {
    pub exercise_id: String,
    pub set_index: u32,
}

impl SetSlot {
    pub fn new(exercise_id: impl Into<String>, set_index: u32) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            set_index,
        }
    }

    /// The legacy marker string for this slot (`<id>-set-<N>`)
    pub fn marker(&self) -> String {
        format!("{}-set-{}", self.exercise_id, self.set_index)
    }
}

/// Completion state for the active, not-yet-finalized session
///
/// Stores only per-set completion. "Exercise fully done" is always derived
/// on read, so the parent/child markers of the wire format can never fall
/// out of sync. The dual-marker shape (bare exercise id plus
/// `<id>-set-<N>` strings) exists only at the serialization boundary via
/// [`CompletionState::to_markers`] and [`CompletionState::from_markers`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionState {
    done: BTreeSet<SetSlot>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn insert(&mut self, slot: SetSlot) -> bool {
        self.done.insert(slot)
    }

    pub fn remove(&mut self, slot: &SetSlot) -> bool {
        self.done.remove(slot)
    }

    pub fn contains(&self, slot: &SetSlot) -> bool {
        self.done.contains(slot)
    }

    pub fn is_set_done(&self, exercise_id: &str, set_index: u32) -> bool {
        self.done
            .contains(&SetSlot::new(exercise_id.to_string(), set_index))
    }

    /// Number of completed sets for one exercise
    pub fn completed_sets_for(&self, exercise: &ExerciseDefinition) -> u32 {
        (1..=exercise.set_count())
            .filter(|i| self.is_set_done(&exercise.id, *i))
            .count() as u32
    }

    /// Derived: an exercise is done when every one of its sets is done
    pub fn exercise_done(&self, exercise: &ExerciseDefinition) -> bool {
        self.completed_sets_for(exercise) == exercise.set_count()
    }

    /// Render the legacy marker list for persistence and export
    ///
    /// Emits one `<id>-set-<N>` marker per completed set, plus the bare
    /// exercise id exactly when all sets of that exercise are complete.
    /// The invariant of the wire format holds by construction.
    pub fn to_markers(&self, workout: &WorkoutDefinition) -> Vec<String> {
        let mut markers = Vec::new();
        for exercise in &workout.exercises {
            let mut complete = 0;
            for i in 1..=exercise.set_count() {
                if self.is_set_done(&exercise.id, i) {
                    markers.push(format!("{}-set-{}", exercise.id, i));
                    complete += 1;
                }
            }
            if complete == exercise.set_count() {
                markers.push(exercise.id.clone());
            }
        }
        markers
    }

    /// Parse the legacy marker list back into per-set state
    ///
    /// Composite `<id>-set-<N>` markers map to their slot directly; a bare
    /// exercise id expands to all of that exercise's slots. Markers that
    /// reference an unknown exercise or an out-of-range set are dropped.
    pub fn from_markers<'a>(
        workout: &WorkoutDefinition,
        markers: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut state = Self::default();
        for marker in markers {
            if let Some((exercise_id, set_index)) = parse_set_marker(marker) {
                if let Some(exercise) = workout.exercise(&exercise_id) {
                    if set_index >= 1 && set_index <= exercise.set_count() {
                        state.insert(SetSlot::new(exercise_id, set_index));
                        continue;
                    }
                }
                tracing::debug!("Dropping unresolvable set marker: {}", marker);
            } else if let Some(exercise) = workout.exercise(marker) {
                for i in 1..=exercise.set_count() {
                    state.insert(SetSlot::new(exercise.id.clone(), i));
                }
            } else {
                tracing::debug!("Dropping marker for unknown exercise: {}", marker);
            }
        }
        state
    }
}

/// Parse a composite set marker (`<id>-set-<N>`)
///
/// Splits on the last `-set-` occurrence because exercise ids may
/// themselves contain hyphens.
fn parse_set_marker(marker: &str) -> Option<(String, u32)> {
    let idx = marker.rfind("-set-")?;
    let exercise_id = &marker[..idx];
    if exercise_id.is_empty() {
        return None;
    }
    let set_index: u32 = marker[idx + "-set-".len()..].parse().ok()?;
    Some((exercise_id.to_string(), set_index))
}

// ============================================================================
// Per-Set Input Data (weight/reps)
// ============================================================================

/// Which numeric input a value belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
}

impl SetField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetField::Weight => "weight",
            SetField::Reps => "reps",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "weight" => Some(SetField::Weight),
            "reps" => Some(SetField::Reps),
            _ => None,
        }
    }
}

/// Free-form numeric-as-string inputs for one set
///
/// No validation beyond parse-on-read; non-numeric values coerce to 0 at
/// the point of derived computation, never earlier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetEntry {
    pub weight: Option<String>,
    pub reps: Option<String>,
}

impl SetEntry {
    /// Both fields recorded and non-empty
    pub fn is_complete_pair(&self) -> bool {
        self.weight.as_deref().is_some_and(|w| !w.is_empty())
            && self.reps.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// Per-set numeric inputs for a session, keyed by (exercise, set)
///
/// Serializes to the legacy flat map (`"<id>-set-<N>-weight"` /
/// `"...-reps"`) so stored documents and backups keep the original schema,
/// while in-memory access is fully structured.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetData {
    entries: BTreeMap<(String, u32), SetEntry>,
}

impl SetData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite one field; no history is retained
    pub fn set(&mut self, exercise_id: &str, set_index: u32, field: SetField, value: String) {
        let entry = self
            .entries
            .entry((exercise_id.to_string(), set_index))
            .or_default();
        match field {
            SetField::Weight => entry.weight = Some(value),
            SetField::Reps => entry.reps = Some(value),
        }
    }

    pub fn get(&self, exercise_id: &str, set_index: u32, field: SetField) -> Option<&str> {
        let entry = self.entries.get(&(exercise_id.to_string(), set_index))?;
        match field {
            SetField::Weight => entry.weight.as_deref(),
            SetField::Reps => entry.reps.as_deref(),
        }
    }

    pub fn entry(&self, exercise_id: &str, set_index: u32) -> Option<&SetEntry> {
        self.entries.get(&(exercise_id.to_string(), set_index))
    }

    /// Iterate all (exercise, set) slots with recorded inputs
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, &SetEntry)> {
        self.entries
            .iter()
            .map(|((id, idx), entry)| (id.as_str(), *idx, entry))
    }
}

/// Parse a legacy field key (`<id>-set-<N>-weight` / `-reps`)
pub fn parse_field_key(key: &str) -> Option<(String, u32, SetField)> {
    let idx = key.rfind("-set-")?;
    let exercise_id = &key[..idx];
    if exercise_id.is_empty() {
        return None;
    }
    let rest = &key[idx + "-set-".len()..];
    let (index_str, field_str) = rest.split_once('-')?;
    let set_index: u32 = index_str.parse().ok()?;
    let field = SetField::parse(field_str)?;
    Some((exercise_id.to_string(), set_index, field))
}

impl Serialize for SetData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for ((exercise_id, set_index), entry) in &self.entries {
            if let Some(weight) = &entry.weight {
                map.serialize_entry(
                    &format!("{}-set-{}-weight", exercise_id, set_index),
                    weight,
                )?;
            }
            if let Some(reps) = &entry.reps {
                map.serialize_entry(&format!("{}-set-{}-reps", exercise_id, set_index), reps)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SetData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut data = SetData::default();
        for (key, value) in raw {
            match parse_field_key(&key) {
                Some((exercise_id, set_index, field)) => {
                    data.set(&exercise_id, set_index, field, value);
                }
                None => {
                    tracing::debug!("Ignoring unrecognized set data key: {}", key);
                }
            }
        }
        Ok(data)
    }
}

// ============================================================================
// Progress Entry and Finalized Records
// ============================================================================

/// In-progress state for one calendar day, not yet finalized
///
/// Created lazily on first mutation; deleted when the day is finalized.
/// `completed_exercises` holds the legacy marker list (see
/// [`CompletionState::to_markers`]).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    #[serde(default)]
    pub completed_exercises: Vec<String>,
    #[serde(default)]
    pub set_data: SetData,
}

impl ProgressEntry {
    pub fn is_empty(&self) -> bool {
        self.completed_exercises.is_empty() && self.set_data.is_empty()
    }
}

/// A finalized workout session (History Log entry)
///
/// Immutable once created except for deletion by `completed_at`, which is
/// the log's identity key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub date: DateTime<Utc>,
    pub date_string: NaiveDate,
    pub workout_template_id: String,
    pub completed_exercises: Vec<String>,
    #[serde(default)]
    pub set_data: SetData,
    pub completed_at: DateTime<Utc>,
}

/// One per-set performance record, extracted at finalization
///
/// Created only for sets that recorded both a weight and a reps value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistoryRecord {
    pub exercise_id: String,
    pub set_number: u32,
    pub weight: f64,
    pub reps: i64,
    pub volume: f64,
    pub date: DateTime<Utc>,
}

// ============================================================================
// Weekly Schedule
// ============================================================================

/// Mapping from weekday index (0 = Sunday .. 6 = Saturday) to template id
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Schedule {
    days: BTreeMap<u8, String>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_day(&mut self, weekday: u8, template_id: impl Into<String>) {
        self.days.insert(weekday, template_id.into());
    }

    pub fn template_for(&self, weekday: u8) -> Option<&str> {
        self.days.get(&weekday).map(|s| s.as_str())
    }

    pub fn template_for_date(&self, date: NaiveDate) -> Option<&str> {
        self.template_for(weekday_index(date))
    }

    pub fn days(&self) -> &BTreeMap<u8, String> {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Weekday index of a date with Sunday = 0 (matching the schedule keys)
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout() -> WorkoutDefinition {
        WorkoutDefinition {
            id: "legs".into(),
            name: "Legs".into(),
            exercises: vec![
                ExerciseDefinition {
                    id: "legs-1".into(),
                    name: "Warmup".into(),
                    notes: String::new(),
                    sets: 1,
                },
                ExerciseDefinition {
                    id: "legs-3".into(),
                    name: "Leg curls".into(),
                    notes: String::new(),
                    sets: 3,
                },
            ],
        }
    }

    #[test]
    fn test_marker_roundtrip_partial() {
        let workout = workout();
        let mut state = CompletionState::new();
        state.insert(SetSlot::new("legs-3", 1));
        state.insert(SetSlot::new("legs-3", 3));

        let markers = state.to_markers(&workout);
        assert_eq!(markers, vec!["legs-3-set-1", "legs-3-set-3"]);

        let parsed = CompletionState::from_markers(&workout, markers.iter().map(|s| s.as_str()));
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_bare_marker_emitted_only_when_all_sets_done() {
        let workout = workout();
        let mut state = CompletionState::new();
        for i in 1..=3 {
            state.insert(SetSlot::new("legs-3", i));
        }

        let markers = state.to_markers(&workout);
        assert!(markers.contains(&"legs-3".to_string()));
        assert!(!markers.contains(&"legs-1".to_string()));
    }

    #[test]
    fn test_bare_marker_expands_to_all_sets() {
        let workout = workout();
        let state = CompletionState::from_markers(&workout, ["legs-3"]);

        assert!(state.is_set_done("legs-3", 1));
        assert!(state.is_set_done("legs-3", 2));
        assert!(state.is_set_done("legs-3", 3));
        assert!(state.exercise_done(workout.exercise("legs-3").unwrap()));
    }

    #[test]
    fn test_single_set_exercise_markers() {
        let workout = workout();
        let mut state = CompletionState::new();
        state.insert(SetSlot::new("legs-1", 1));

        let markers = state.to_markers(&workout);
        assert!(markers.contains(&"legs-1".to_string()));
        assert!(markers.contains(&"legs-1-set-1".to_string()));

        let parsed = CompletionState::from_markers(&workout, markers.iter().map(|s| s.as_str()));
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_unknown_markers_dropped() {
        let workout = workout();
        let state = CompletionState::from_markers(&workout, ["ghost", "legs-3-set-9"]);
        assert!(state.is_empty());
    }

    #[test]
    fn test_parse_field_key_hyphenated_id() {
        let (id, idx, field) = parse_field_key("legs-1-set-2-weight").unwrap();
        assert_eq!(id, "legs-1");
        assert_eq!(idx, 2);
        assert_eq!(field, SetField::Weight);

        assert!(parse_field_key("legs-1-set-2-volume").is_none());
        assert!(parse_field_key("no-pattern-here").is_none());
    }

    #[test]
    fn test_set_data_legacy_serialization() {
        let mut data = SetData::new();
        data.set("legs-3", 1, SetField::Weight, "50".into());
        data.set("legs-3", 1, SetField::Reps, "10".into());

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["legs-3-set-1-weight"], "50");
        assert_eq!(json["legs-3-set-1-reps"], "10");

        let parsed: SetData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_set_data_ignores_foreign_keys() {
        let json = serde_json::json!({
            "legs-3-set-1-weight": "50",
            "free-note": "hello"
        });
        let parsed: SetData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.get("legs-3", 1, SetField::Weight), Some("50"));
        assert!(parsed.entry("free-note", 1).is_none());
    }

    #[test]
    fn test_schedule_serializes_with_string_keys() {
        let mut schedule = Schedule::new();
        schedule.set_day(0, "rest");
        schedule.set_day(1, "legs");

        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["0"], "rest");
        assert_eq!(json["1"], "legs");

        let parsed: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.template_for(1), Some("legs"));
    }

    #[test]
    fn test_weekday_index_sunday_is_zero() {
        // 2024-06-09 was a Sunday
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(sunday.succ_opt().unwrap()), 1);
    }
}
