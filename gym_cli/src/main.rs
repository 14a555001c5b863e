use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use gym_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gymtick")]
#[command(about = "Workout tracking and progress system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's workout and progress (default)
    Today,

    /// Toggle completion of an exercise, or one of its sets
    Toggle {
        /// Exercise id (e.g. legs-3)
        exercise: String,

        /// Toggle only this set (1-based)
        #[arg(long)]
        set: Option<u32>,

        /// Use this template instead of today's scheduled one
        #[arg(long)]
        workout: Option<String>,
    },

    /// Record weight and reps for one set
    Record {
        /// Exercise id
        exercise: String,

        /// Set number (1-based)
        set: u32,

        /// Weight lifted (kg)
        #[arg(long)]
        weight: String,

        /// Repetitions performed
        #[arg(long)]
        reps: String,
    },

    /// Finalize today's session into the history log
    Done {
        /// Use this template instead of today's scheduled one
        #[arg(long)]
        workout: Option<String>,

        /// Log again even if today already has an entry
        #[arg(long)]
        redo: bool,
    },

    /// Show workout statistics
    Stats,

    /// Suggest the next progression for an exercise
    Suggest {
        /// Exercise id
        exercise: String,
    },

    /// Show finalized workout history
    History {
        /// Show at most this many entries
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Delete the log with this completion timestamp (RFC 3339)
        #[arg(long)]
        delete: Option<String>,
    },

    /// Export data to a backup file
    Export {
        /// Output path
        path: PathBuf,

        /// Write the exercise ledger as CSV instead of a JSON backup
        #[arg(long)]
        csv: bool,
    },

    /// Import data from a backup file
    Import {
        /// Backup file path
        path: PathBuf,
    },

    /// Show the weekly schedule
    Schedule,
}

fn main() -> Result<()> {
    gym_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;

    let paths = StorePaths::new(data_dir);
    catalog::seed_defaults(&paths)?;

    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Today) | None => cmd_today(&paths, today),
        Some(Commands::Toggle {
            exercise,
            set,
            workout,
        }) => cmd_toggle(&paths, &exercise, set, workout.as_deref(), today),
        Some(Commands::Record {
            exercise,
            set,
            weight,
            reps,
        }) => cmd_record(&paths, &exercise, set, &weight, &reps, today),
        Some(Commands::Done { workout, redo }) => {
            cmd_done(&paths, workout.as_deref(), redo, today)
        }
        Some(Commands::Stats) => cmd_stats(&paths, today),
        Some(Commands::Suggest { exercise }) => cmd_suggest(&paths, &exercise),
        Some(Commands::History { limit, delete }) => cmd_history(&paths, limit, delete),
        Some(Commands::Export { path, csv }) => cmd_export(&paths, &path, csv),
        Some(Commands::Import { path }) => cmd_import(&paths, &path),
        Some(Commands::Schedule) => cmd_schedule(&paths),
    }
}

fn load_workout(
    paths: &StorePaths,
    template_id: Option<&str>,
    today: NaiveDate,
) -> Result<(TemplateMap, WorkoutDefinition)> {
    let templates = catalog::load_templates(paths)?;
    let workout = match template_id {
        Some(id) => engine::template_by_id(&templates, id)?.clone(),
        None => {
            let schedule = catalog::load_schedule(paths)?;
            engine::template_for_day(&templates, &schedule, today)?.clone()
        }
    };
    Ok((templates, workout))
}

fn cmd_today(paths: &StorePaths, today: NaiveDate) -> Result<()> {
    let (_, workout) = load_workout(paths, None, today)?;

    println!("{} — {}", today, workout.name);

    if workout.is_rest() {
        println!("\nRest day. No exercises scheduled.");
        return Ok(());
    }

    let progress = ProgressStore::new(paths);
    let entry = progress.entry(today)?;
    let state = CompletionState::from_markers(
        &workout,
        entry.completed_exercises.iter().map(|m| m.as_str()),
    );

    println!();
    for exercise in &workout.exercises {
        let mark = if state.exercise_done(exercise) {
            "x"
        } else {
            " "
        };
        let sets = if exercise.set_count() > 1 {
            let done = state.completed_sets_for(exercise);
            format!(" ({}/{} sets)", done, exercise.set_count())
        } else {
            String::new()
        };
        let notes = if exercise.notes.is_empty() {
            String::new()
        } else {
            format!(" — {}", exercise.notes)
        };
        println!("  [{}] {} {}{}{}", mark, exercise.id, exercise.name, sets, notes);
    }

    let summary = compute_progress(&workout, &state);
    println!(
        "\nProgress: {}/{} sets ({:.0}%)",
        summary.completed_sets, summary.total_sets, summary.percentage
    );

    if HistoryLog::new(paths).completed_on(today, Some(&workout.id))? {
        println!("Already logged for today. Use `gymtick done --redo` to log again.");
    } else if summary.is_complete {
        println!("Workout complete! Run `gymtick done` to log it.");
    }

    Ok(())
}

fn cmd_toggle(
    paths: &StorePaths,
    exercise_id: &str,
    set: Option<u32>,
    template_id: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let (_, workout) = load_workout(paths, template_id, today)?;
    let progress = ProgressStore::new(paths);

    let state = match set {
        Some(set_index) => {
            engine::toggle_set(&progress, &workout, exercise_id, set_index, today)?
        }
        None => engine::toggle_exercise(&progress, &workout, exercise_id, today)?,
    };

    let summary = compute_progress(&workout, &state);
    println!(
        "Progress: {}/{} sets ({:.0}%)",
        summary.completed_sets, summary.total_sets, summary.percentage
    );
    Ok(())
}

fn cmd_record(
    paths: &StorePaths,
    exercise_id: &str,
    set: u32,
    weight: &str,
    reps: &str,
    today: NaiveDate,
) -> Result<()> {
    let progress = ProgressStore::new(paths);
    progress.set_field_value(today, exercise_id, set, SetField::Weight, weight)?;
    progress.set_field_value(today, exercise_id, set, SetField::Reps, reps)?;

    println!("Recorded {} set {}: {}kg x {} reps", exercise_id, set, weight, reps);
    Ok(())
}

fn cmd_done(
    paths: &StorePaths,
    template_id: Option<&str>,
    redo: bool,
    today: NaiveDate,
) -> Result<()> {
    let (_, workout) = load_workout(paths, template_id, today)?;
    let progress = ProgressStore::new(paths);
    let history = HistoryLog::new(paths);
    let ledger = ExerciseLedger::new(paths);

    if !redo && history.completed_on(today, Some(&workout.id))? {
        println!(
            "{} already logged for {}. Use --redo to log it again.",
            workout.name, today
        );
        return Ok(());
    }

    let entry = progress.entry(today)?;
    let log = finalize(
        &progress,
        &history,
        &ledger,
        &workout.id,
        entry.completed_exercises.clone(),
        today,
        Utc::now(),
        None,
    )?;

    println!(
        "Logged {} for {} ({} exercise markers).",
        workout.name,
        today,
        log.completed_exercises.len()
    );
    Ok(())
}

fn weekday_name(index: u8) -> &'static str {
    match index {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

fn cmd_stats(paths: &StorePaths, today: NaiveDate) -> Result<()> {
    let logs = HistoryLog::new(paths).load()?;
    let schedule = catalog::load_schedule(paths)?;
    let templates = catalog::load_templates(paths)?;

    let stats = quick_stats(&logs, today);
    let consistency = analytics::weekly_consistency(&schedule, &templates, &logs, today);

    println!("Total workouts:    {}", stats.total_workouts);
    println!("This month:        {}", stats.monthly_workouts);
    println!("Current streak:    {} day(s)", stats.current_streak);
    println!("Weekly consistency: {}%", consistency);
    match stats.most_frequent_weekday {
        Some(day) => println!("Most frequent day: {}", day),
        None => println!("Most frequent day: n/a"),
    }
    Ok(())
}

fn cmd_suggest(paths: &StorePaths, exercise_id: &str) -> Result<()> {
    let ledger = ExerciseLedger::new(paths);
    match ledger.last_session(exercise_id)? {
        Some(last) => {
            let suggestion = suggest_progression(last.weight, last.reps);
            println!(
                "Last session: {}kg x {} reps ({})",
                last.weight,
                last.reps,
                last.date.format("%Y-%m-%d")
            );
            println!("Suggestion: {}", suggestion.message);
        }
        None => {
            println!("No recorded sessions for {}.", exercise_id);
        }
    }
    Ok(())
}

fn cmd_history(paths: &StorePaths, limit: usize, delete: Option<String>) -> Result<()> {
    let history = HistoryLog::new(paths);

    if let Some(timestamp) = delete {
        let completed_at: DateTime<Utc> = timestamp
            .parse()
            .map_err(|e| Error::Storage(format!("invalid timestamp '{}': {}", timestamp, e)))?;
        let removed = history.delete(completed_at)?;
        println!("Deleted {} log(s).", removed);
        return Ok(());
    }

    let logs = history.load_sorted()?;
    if logs.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    let templates = catalog::load_templates(paths)?;
    for log in logs.iter().take(limit) {
        let name = templates
            .get(&log.workout_template_id)
            .map(|w| w.name.as_str())
            .unwrap_or(log.workout_template_id.as_str());
        println!(
            "{}  {}  ({} markers)  completed_at={}",
            log.date_string,
            name,
            log.completed_exercises.len(),
            log.completed_at.to_rfc3339()
        );
    }
    Ok(())
}

fn cmd_export(paths: &StorePaths, out_path: &PathBuf, csv: bool) -> Result<()> {
    if csv {
        let count = export_history_csv(paths, out_path)?;
        println!("Wrote {} ledger records to {}", count, out_path.display());
    } else {
        export_backup(paths, out_path, Utc::now())?;
        println!("Exported backup to {}", out_path.display());
    }
    Ok(())
}

fn cmd_import(paths: &StorePaths, in_path: &PathBuf) -> Result<()> {
    let backup = import_backup(paths, in_path)?;
    println!(
        "Imported {} template(s) and {} log(s).",
        backup.templates.len(),
        backup.logs.len()
    );
    Ok(())
}

fn cmd_schedule(paths: &StorePaths) -> Result<()> {
    let schedule = catalog::load_schedule(paths)?;
    let templates = catalog::load_templates(paths)?;

    for day in 0..7u8 {
        let line = schedule
            .template_for(day)
            .map(|id| {
                templates
                    .get(id)
                    .map(|w| w.name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .unwrap_or_else(|| "(unscheduled)".to_string());
        println!("{:<10} {}", weekday_name(day), line);
    }
    Ok(())
}
