//! Analytics over a collection snapshot.
//!
//! Every function here is pure: it takes the identities and the current local
//! date and returns plain serializable reports. Nothing is cached.

mod completion;
mod history;
mod profile;
mod streak;
mod weekly;

pub use completion::{completion_rate, habit_breakdowns, totals, HabitBreakdown, Totals};
pub use history::{intensity, logs_on, month_history, CalendarDay, DayLogEntry, MonthHistory};
pub use profile::{days_active, profile_summary, ProfileSummary};
pub use streak::{calc_streak, habit_streak, overall_streak, Streak, STREAK_WINDOW_DAYS};
pub use weekly::{
    summarize_week, week_bars, week_report, DayBar, WeekReport, WeeklySummary, WEEK_DAYS,
};
