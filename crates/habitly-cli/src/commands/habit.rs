use clap::Subcommand;
use habitly_core::catalog::suggest_habits;
use habitly_core::derive::enrich_habit;
use habitly_core::entitlement::check_add_habit;
use habitly_core::model::{find_habit, DEFAULT_HABIT_DURATION};
use habitly_core::{Habit, HabitPatch, Timing};
use uuid::Uuid;

use super::print_json;
use crate::session::Session;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit to an identity (created on the fly if unknown)
    Add {
        /// Owning identity id
        identity: String,
        label: String,
        #[arg(long)]
        icon: Option<String>,
        /// morning, afternoon, evening, night or anytime
        #[arg(long, default_value = "anytime")]
        timing: Timing,
        /// Target minutes per completion
        #[arg(long, default_value_t = DEFAULT_HABIT_DURATION)]
        duration: u32,
    },
    /// List habits with today's status
    List {
        /// Only habits of this identity
        #[arg(long)]
        identity: Option<String>,
    },
    /// Change label, timing or target duration
    Edit {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        timing: Option<Timing>,
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Delete a habit and its history
    Delete { id: String },
    /// Mark a habit done today
    Log {
        id: String,
        /// Minutes performed (defaults to the habit's target)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Remove today's log
    Undo { id: String },
    /// Reorder an identity's habits
    Reorder {
        identity: String,
        /// Every habit id of the identity, in the new order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Suggested habits for an identity from the catalog
    Suggest {
        identity: String,
        /// Add every suggestion instead of listing them
        #[arg(long)]
        add: bool,
    },
}

pub async fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    let today = session.tracker.today();

    match action {
        HabitAction::Add {
            identity,
            label,
            icon,
            timing,
            duration,
        } => {
            if label.trim().is_empty() {
                return Err("label must not be empty".into());
            }
            check_add_habit(&session.entitlement, &session.tracker.snapshot())?;

            let mut habit = Habit::new(Uuid::new_v4().to_string(), identity, label.trim())
                .with_timing(timing)
                .with_duration(duration);
            if let Some(icon) = icon {
                habit = habit.with_icon(icon);
            }
            session.tracker.add_habit(habit.clone());
            print_json(&habit)?;
        }
        HabitAction::List { identity } => {
            let snapshot = session.tracker.snapshot();
            let views: Vec<_> = snapshot
                .iter()
                .filter(|i| identity.as_deref().map_or(true, |id| i.id == id))
                .flat_map(|i| i.habits.iter())
                .map(|h| enrich_habit(h, today))
                .collect();
            print_json(&views)?;
        }
        HabitAction::Edit {
            id,
            label,
            timing,
            duration,
        } => {
            require_habit(&session, &id)?;
            let patch = HabitPatch {
                label,
                timing,
                duration,
            };
            session.tracker.edit_habit(&id, &patch);
            println!("ok");
        }
        HabitAction::Delete { id } => {
            if !session.tracker.delete_habit(&id) {
                return Err(format!("unknown habit: {id}").into());
            }
            println!("habit deleted: {id}");
        }
        HabitAction::Log { id, minutes } => {
            let habit = require_habit(&session, &id)?;
            let minutes = minutes.unwrap_or(habit.duration);
            session.tracker.log_completion(&habit, minutes);
            println!("logged {minutes} min for {} on {today}", habit.label);
        }
        HabitAction::Undo { id } => {
            let habit = require_habit(&session, &id)?;
            if session.tracker.undo_completion(&habit) {
                println!("undone: {} on {today}", habit.label);
            } else {
                println!("nothing logged today for {}", habit.label);
            }
        }
        HabitAction::Reorder { identity, ids } => {
            if !session.tracker.snapshot().iter().any(|i| i.id == identity) {
                return Err(format!("unknown identity: {identity}").into());
            }
            session.tracker.reorder_habits(&identity, &ids)?;
            println!("ok");
        }
        HabitAction::Suggest { identity, add } => {
            let snapshot = session.tracker.snapshot();
            let owner = snapshot
                .iter()
                .find(|i| i.id == identity)
                .ok_or_else(|| format!("unknown identity: {identity}"))?;
            let suggestions = suggest_habits(owner);

            if add {
                let mut added = Vec::new();
                let mut limited = None;
                for suggestion in suggestions {
                    let snapshot = session.tracker.snapshot();
                    if let Err(e) = check_add_habit(&session.entitlement, &snapshot) {
                        limited = Some(e);
                        break;
                    }
                    let habit = suggestion.instantiate(&identity);
                    session.tracker.add_habit(habit.clone());
                    added.push(habit);
                }
                print_json(&added)?;
                if let Some(e) = limited {
                    session.finish().await;
                    return Err(e.into());
                }
            } else {
                print_json(&suggestions)?;
            }
        }
    }

    session.finish().await;
    Ok(())
}

fn require_habit(session: &Session, id: &str) -> Result<Habit, Box<dyn std::error::Error>> {
    find_habit(&session.tracker.snapshot(), id)
        .cloned()
        .ok_or_else(|| format!("unknown habit: {id}").into())
}
