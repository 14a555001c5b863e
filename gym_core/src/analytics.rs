//! Analytics engine: pure read-side computations over the history log.
//!
//! Every function takes an explicit reference date instead of consulting
//! the clock, so results are deterministic under test.

use crate::{Schedule, TemplateMap, WorkoutLog};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Reps at or above this suggest adding weight instead of reps
pub const PROGRESSION_REP_THRESHOLD: i64 = 12;
/// Weight increment suggested once the rep threshold is reached (kg)
pub const PROGRESSION_WEIGHT_INCREMENT_KG: f64 = 2.5;
/// Rep increment suggested below the threshold
pub const PROGRESSION_REP_INCREMENT: i64 = 1;

/// Consecutive-day streak ending today
///
/// Dedupes logs to unique calendar dates and walks backward from `today`
/// one day at a time, stopping at the first gap. The walk starts at
/// `today`, so a day with no log yet reads as a streak of 0 even when
/// yesterday ends a long chain; the streak reappears once today's
/// workout is logged.
pub fn streak(logs: &[WorkoutLog], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = logs.iter().map(|log| log.date_string).collect();

    let mut streak = 0;
    for i in 0.. {
        let expected = today - Duration::days(i);
        if dates.contains(&expected) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Number of logs whose date falls in the given calendar month
pub fn monthly_count(logs: &[WorkoutLog], year: i32, month: u32) -> usize {
    logs.iter()
        .filter(|log| log.date_string.year() == year && log.date_string.month() == month)
        .count()
}

/// The weekday with the most logged sessions
///
/// Ties break toward the lowest weekday index (Sunday first); returns
/// None when there are no logs, which callers render as "N/A".
pub fn most_frequent_weekday(logs: &[WorkoutLog]) -> Option<Weekday> {
    if logs.is_empty() {
        return None;
    }

    let mut counts = [0usize; 7];
    for log in logs {
        counts[log.date_string.weekday().num_days_from_sunday() as usize] += 1;
    }

    let mut best = 0;
    for idx in 1..7 {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }

    // Index 0 is Sunday in both the schedule keys and this table
    Some(match best {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    })
}

/// Month-to-date consistency: sessions vs scheduled non-rest days
///
/// Counts scheduled non-rest days from the 1st of the month through
/// `reference_date` inclusive, against distinct logged dates in that
/// window. A day is non-rest when its scheduled id resolves to a template
/// with at least one exercise. With nothing scheduled the result is 100:
/// nothing required counts as fully met. Sessions on unscheduled days can
/// push the raw ratio past 1, so the result clamps at 100.
pub fn weekly_consistency(
    schedule: &Schedule,
    templates: &TemplateMap,
    logs: &[WorkoutLog],
    reference_date: NaiveDate,
) -> u32 {
    let mut scheduled_so_far = 0u32;
    for day in 1..=reference_date.day() {
        let date = NaiveDate::from_ymd_opt(reference_date.year(), reference_date.month(), day)
            .expect("day <= reference_date.day() is always valid");
        let is_training_day = schedule
            .template_for_date(date)
            .and_then(|id| templates.get(id))
            .map_or(false, |t| !t.is_rest());
        if is_training_day {
            scheduled_so_far += 1;
        }
    }

    let first_of_month =
        NaiveDate::from_ymd_opt(reference_date.year(), reference_date.month(), 1)
            .expect("day 1 always valid");
    let sessions_so_far = logs
        .iter()
        .filter(|log| log.date_string >= first_of_month && log.date_string <= reference_date)
        .map(|log| log.date_string)
        .collect::<BTreeSet<_>>()
        .len() as u32;

    if scheduled_so_far == 0 {
        return 100;
    }

    let ratio = f64::from(sessions_so_far) / f64::from(scheduled_so_far) * 100.0;
    (ratio.round() as u32).min(100)
}

/// What a progression suggestion asks the user to increase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionKind {
    Weight,
    Reps,
}

/// Policy-driven progressive-overload recommendation
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionSuggestion {
    pub kind: SuggestionKind,
    pub suggested: f64,
    pub message: String,
}

/// Suggest the next progression step from the last recorded set
///
/// At or above the rep threshold, add weight; below it, add a rep. The
/// threshold and increments are fixed policy constants.
pub fn suggest_progression(last_weight: f64, last_reps: i64) -> ProgressionSuggestion {
    if last_reps >= PROGRESSION_REP_THRESHOLD {
        let suggested = last_weight + PROGRESSION_WEIGHT_INCREMENT_KG;
        ProgressionSuggestion {
            kind: SuggestionKind::Weight,
            suggested,
            message: format!("+{}kg ({}kg)", PROGRESSION_WEIGHT_INCREMENT_KG, suggested),
        }
    } else {
        let suggested = last_reps + PROGRESSION_REP_INCREMENT;
        ProgressionSuggestion {
            kind: SuggestionKind::Reps,
            suggested: suggested as f64,
            message: format!("+{} rep ({} reps)", PROGRESSION_REP_INCREMENT, suggested),
        }
    }
}

/// Headline numbers for the stats display
#[derive(Clone, Debug, PartialEq)]
pub struct QuickStats {
    pub total_workouts: usize,
    pub monthly_workouts: usize,
    pub current_streak: u32,
    pub most_frequent_weekday: Option<Weekday>,
}

/// Roll up the headline stats for a reference date
pub fn quick_stats(logs: &[WorkoutLog], today: NaiveDate) -> QuickStats {
    QuickStats {
        total_workouts: logs.len(),
        monthly_workouts: monthly_count(logs, today.year(), today.month()),
        current_streak: streak(logs, today),
        most_frequent_weekday: most_frequent_weekday(logs),
    }
}
