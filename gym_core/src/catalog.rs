//! Built-in workout templates and the default weekly schedule.
//!
//! Templates and schedule are user-editable documents; this module holds
//! the seed data written on first run, plus validation and the typed
//! load/save wrappers around their documents.

use crate::store::{load_document, save_document, StorePaths};
use crate::{ExerciseDefinition, Result, Schedule, TemplateMap, WorkoutDefinition};
use once_cell::sync::Lazy;

/// Template id used for rest days in the default schedule
pub const REST_TEMPLATE_ID: &str = "rest";

/// Cached default templates - built once and reused across all operations
static DEFAULT_TEMPLATES: Lazy<TemplateMap> = Lazy::new(build_default_templates);

/// Get a reference to the cached default template set
pub fn get_default_templates() -> &'static TemplateMap {
    &DEFAULT_TEMPLATES
}

fn exercise(id: &str, name: &str, notes: &str, sets: u32) -> ExerciseDefinition {
    ExerciseDefinition {
        id: id.into(),
        name: name.into(),
        notes: notes.into(),
        sets,
    }
}

fn template(id: &str, name: &str, exercises: Vec<ExerciseDefinition>) -> WorkoutDefinition {
    WorkoutDefinition {
        id: id.into(),
        name: name.into(),
        exercises,
    }
}

/// Builds the default weekly template set
///
/// **Note**: For production use, prefer `get_default_templates()` which
/// returns a cached reference. This function is retained for testing and
/// custom catalog creation.
pub fn build_default_templates() -> TemplateMap {
    let mut templates = TemplateMap::new();

    templates.insert(
        "legs".into(),
        template(
            "legs",
            "Legs",
            vec![
                exercise("legs-1", "Warmup: Cycling", "10 minutes", 1),
                exercise("legs-2", "Stretching", "", 1),
                exercise("legs-3", "Leg curls", "", 3),
                exercise("legs-4", "Leg extensions", "", 3),
                exercise("legs-5", "Burpees", "15 x 3", 3),
            ],
        ),
    );

    templates.insert(
        "chestTriceps1".into(),
        template(
            "chestTriceps1",
            "Chest + Triceps",
            vec![
                exercise("ct1-1", "Chest workout", "", 1),
                exercise("ct1-2", "Triceps workout", "", 1),
            ],
        ),
    );

    templates.insert(
        "chestTriceps2".into(),
        template(
            "chestTriceps2",
            "Chest + Triceps",
            vec![
                exercise("ct2-1", "Inclined flyes", "2.5kg dumbbells", 1),
                exercise("ct2-2", "Chest press", "", 1),
                exercise("ct2-3", "Declined chest press", "", 1),
                exercise("ct2-4", "Tricep close bar pulldown", "", 1),
                exercise("ct2-5", "Tricep overhead extension", "", 1),
            ],
        ),
    );

    templates.insert(
        "shoulders".into(),
        template(
            "shoulders",
            "Shoulders",
            vec![
                exercise("shoulders-1", "Side raises", "4 sets", 1),
                exercise("shoulders-2", "Shoulder dumbbell overhead press", "", 1),
                exercise("shoulders-3", "Isolated press", "", 1),
                exercise("shoulders-4", "Shrugs", "", 1),
            ],
        ),
    );

    templates.insert(
        "cardioBackBiceps".into(),
        template(
            "cardioBackBiceps",
            "Cardio + Back + Biceps",
            vec![
                exercise("cbb-1", "Cycling", "10 min", 1),
                exercise("cbb-2", "Treadmill", "20 min", 1),
                exercise("cbb-3", "Walker", "20 min", 1),
                exercise("cbb-4", "Assisted pull-ups", "", 1),
                exercise("cbb-5", "Biceps", "", 1),
                exercise("cbb-6", "Dumbbell curls", "", 1),
                exercise("cbb-7", "Barbell curls", "", 1),
            ],
        ),
    );

    templates.insert(
        "chestVariation".into(),
        template(
            "chestVariation",
            "Chest",
            vec![
                exercise("cv-1", "Incline dumbbell flyes", "", 1),
                exercise("cv-2", "Chest press", "", 1),
                exercise("cv-3", "Flat bench press", "", 1),
            ],
        ),
    );

    templates.insert(
        REST_TEMPLATE_ID.into(),
        template(REST_TEMPLATE_ID, "Rest Day", vec![]),
    );

    templates
}

/// The default weekly schedule (Sunday rest, six training days)
pub fn default_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.set_day(0, REST_TEMPLATE_ID);
    schedule.set_day(1, "legs");
    schedule.set_day(2, "chestTriceps1");
    schedule.set_day(3, "chestTriceps2");
    schedule.set_day(4, "shoulders");
    schedule.set_day(5, "cardioBackBiceps");
    schedule.set_day(6, "chestVariation");
    schedule
}

/// Validate templates and schedule for consistency
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate(templates: &TemplateMap, schedule: &Schedule) -> Vec<String> {
    let mut errors = Vec::new();

    for (id, workout) in templates {
        if id.is_empty() || workout.id.is_empty() {
            errors.push("Template has empty ID".to_string());
        }
        if id != &workout.id {
            errors.push(format!(
                "Template key '{}' doesn't match definition.id '{}'",
                id, workout.id
            ));
        }
        if workout.name.is_empty() {
            errors.push(format!("Template '{}' has empty name", id));
        }

        let mut seen = std::collections::HashSet::new();
        for exercise in &workout.exercises {
            if exercise.id.is_empty() {
                errors.push(format!("Template '{}' has an exercise with empty ID", id));
            }
            if !seen.insert(exercise.id.as_str()) {
                errors.push(format!(
                    "Template '{}' has duplicate exercise id '{}'",
                    id, exercise.id
                ));
            }
            if exercise.name.is_empty() {
                errors.push(format!(
                    "Template '{}': exercise '{}' has empty name",
                    id, exercise.id
                ));
            }
        }
    }

    for (weekday, template_id) in schedule.days() {
        if *weekday > 6 {
            errors.push(format!("Schedule has invalid weekday index {}", weekday));
        }
        if !templates.contains_key(template_id) {
            errors.push(format!(
                "Schedule references non-existent template '{}' on weekday {}",
                template_id, weekday
            ));
        }
    }

    errors
}

/// Load stored templates, falling back to the defaults when absent
pub fn load_templates(paths: &StorePaths) -> Result<TemplateMap> {
    let templates: TemplateMap = load_document(&paths.templates_file())?;
    if templates.is_empty() {
        return Ok(get_default_templates().clone());
    }
    Ok(templates)
}

/// Persist the template map
pub fn save_templates(paths: &StorePaths, templates: &TemplateMap) -> Result<()> {
    save_document(&paths.templates_file(), templates)
}

/// Load the stored schedule, falling back to the default when absent
pub fn load_schedule(paths: &StorePaths) -> Result<Schedule> {
    let schedule: Schedule = load_document(&paths.schedule_file())?;
    if schedule.is_empty() {
        return Ok(default_schedule());
    }
    Ok(schedule)
}

/// Persist the schedule
pub fn save_schedule(paths: &StorePaths, schedule: &Schedule) -> Result<()> {
    save_document(&paths.schedule_file(), schedule)
}

/// Write the default documents for any that are missing (first run)
pub fn seed_defaults(paths: &StorePaths) -> Result<()> {
    if !paths.templates_file().exists() {
        save_templates(paths, get_default_templates())?;
        tracing::info!("Seeded default templates");
    }
    if !paths.schedule_file().exists() {
        save_schedule(paths, &default_schedule())?;
        tracing::info!("Seeded default schedule");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_load() {
        let templates = build_default_templates();
        assert_eq!(templates.len(), 7);
        assert!(templates.contains_key(REST_TEMPLATE_ID));
        assert!(templates[REST_TEMPLATE_ID].is_rest());
    }

    #[test]
    fn test_default_catalog_validates() {
        let errors = validate(get_default_templates(), &default_schedule());
        assert!(errors.is_empty(), "Validation errors: {:?}", errors);
    }

    #[test]
    fn test_default_schedule_covers_every_weekday() {
        let schedule = default_schedule();
        for weekday in 0..7 {
            assert!(schedule.template_for(weekday).is_some());
        }
        assert_eq!(schedule.template_for(0), Some(REST_TEMPLATE_ID));
    }

    #[test]
    fn test_legs_template_set_counts() {
        let templates = build_default_templates();
        assert_eq!(templates["legs"].total_sets(), 11);
    }

    #[test]
    fn test_validate_catches_duplicate_exercise_ids() {
        let mut templates = TemplateMap::new();
        templates.insert(
            "bad".into(),
            template(
                "bad",
                "Bad",
                vec![exercise("x", "A", "", 1), exercise("x", "B", "", 1)],
            ),
        );
        let errors = validate(&templates, &Schedule::new());
        assert!(errors.iter().any(|e| e.contains("duplicate exercise id")));
    }

    #[test]
    fn test_validate_catches_dangling_schedule() {
        let mut schedule = Schedule::new();
        schedule.set_day(1, "ghost");
        let errors = validate(get_default_templates(), &schedule);
        assert!(errors.iter().any(|e| e.contains("non-existent template")));
    }

    #[test]
    fn test_seed_then_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let paths = StorePaths::new(temp_dir.path());

        seed_defaults(&paths).unwrap();
        assert!(paths.templates_file().exists());
        assert!(paths.schedule_file().exists());

        let templates = load_templates(&paths).unwrap();
        let schedule = load_schedule(&paths).unwrap();
        assert_eq!(&templates, get_default_templates());
        assert_eq!(schedule, default_schedule());
    }

    #[test]
    fn test_load_falls_back_to_defaults_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let paths = StorePaths::new(temp_dir.path());

        let templates = load_templates(&paths).unwrap();
        assert_eq!(&templates, get_default_templates());
    }
}
