use chrono::NaiveDate;
use clap::Subcommand;
use habitly_core::stats::{
    habit_breakdowns, logs_on, month_history, overall_streak, profile_summary, totals, week_report,
};
use serde_json::json;

use super::print_json;
use crate::session::Session;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's progress
    Today,
    /// Trailing seven days
    Week,
    /// Streak and completion rate per habit
    Habits,
    /// Identity, habit and active-day counts with all-time totals
    Profile,
    /// Month calendar, or the logs of one day
    History {
        /// Months back from the current one (0 = this month)
        #[arg(long, default_value_t = 0)]
        offset: i32,
        /// Show the logs of this day (YYYY-MM-DD) instead
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Overall streak across all habits
    Streak,
}

pub async fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let today = session.tracker.today();
    let grace = session.allow_grace();
    let snapshot = session.tracker.snapshot();

    match action {
        StatsAction::Today => {
            let (done, total) = session.tracker.daily_progress();
            print_json(&json!({
                "date": today,
                "done": done,
                "total": total,
                "identities": session.tracker.identities(),
            }))?;
        }
        StatsAction::Week => {
            print_json(&week_report(&snapshot, today))?;
        }
        StatsAction::Habits => {
            print_json(&habit_breakdowns(&snapshot, today, grace))?;
        }
        StatsAction::Profile => {
            print_json(&json!({
                "summary": profile_summary(&snapshot),
                "totals": totals(&snapshot),
                "streak": overall_streak(&snapshot, today, grace),
            }))?;
        }
        StatsAction::History { offset, date } => match date {
            Some(date) => print_json(&json!({
                "date": date,
                "logs": logs_on(&snapshot, date),
            }))?,
            None => print_json(&month_history(&snapshot, today, -offset.saturating_abs()))?,
        },
        StatsAction::Streak => {
            print_json(&overall_streak(&snapshot, today, grace))?;
        }
    }

    session.finish().await;
    Ok(())
}
