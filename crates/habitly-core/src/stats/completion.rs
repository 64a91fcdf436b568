//! Per-habit completion rate and breakdown.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::streak::{habit_streak, Streak};
use crate::model::{all_habits, Habit, Identity};

/// One row of the per-habit breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitBreakdown {
    pub id: String,
    pub icon: String,
    pub label: String,
    pub streak: Streak,
    /// Percentage of days logged since the first log (0-100).
    pub rate: u32,
    /// Number of logs ever recorded.
    pub completions: usize,
}

/// All-time totals across every log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub completions: usize,
    pub minutes: u64,
}

/// `round(100 * distinct logged days / days since first log)`, where the day
/// range is inclusive of both ends. A habit without logs has rate 0.
pub fn completion_rate(habit: &Habit, today: NaiveDate) -> u32 {
    let dates = habit.log_dates();
    let Some(first) = dates.iter().next() else {
        return 0;
    };

    let days_since_first = ((today - *first).num_days() + 1).max(1);
    let rate = 100.0 * dates.len() as f64 / days_since_first as f64;
    rate.round() as u32
}

/// Streak, rate and completion count for every habit, in collection order.
pub fn habit_breakdowns(
    identities: &[Identity],
    today: NaiveDate,
    allow_grace: bool,
) -> Vec<HabitBreakdown> {
    all_habits(identities)
        .map(|habit| HabitBreakdown {
            id: habit.id.clone(),
            icon: habit.icon.clone(),
            label: habit.label.clone(),
            streak: habit_streak(habit, today, allow_grace),
            rate: completion_rate(habit, today),
            completions: habit.logs.len(),
        })
        .collect()
}

pub fn totals(identities: &[Identity]) -> Totals {
    all_habits(identities).fold(Totals::default(), |acc, habit| Totals {
        completions: acc.completions + habit.logs.len(),
        minutes: acc.minutes + habit.total_minutes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompletionLog;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn habit_with_logs(offsets: &[i64]) -> Habit {
        let mut habit = Habit::new("read", "reader", "Read");
        habit.logs = offsets
            .iter()
            .map(|d| CompletionLog {
                date: today() - Duration::days(*d),
                duration: 10,
            })
            .collect();
        habit
    }

    #[test]
    fn test_rate_over_inclusive_range() {
        // first log 4 days ago, 3 distinct days in a 5-day range
        assert_eq!(completion_rate(&habit_with_logs(&[4, 2, 0]), today()), 60);
    }

    #[test]
    fn test_rate_without_logs_is_zero() {
        assert_eq!(completion_rate(&habit_with_logs(&[]), today()), 0);
    }

    #[test]
    fn test_rate_first_logged_today_is_full() {
        assert_eq!(completion_rate(&habit_with_logs(&[0]), today()), 100);
    }

    #[test]
    fn test_rate_rounds_half_up() {
        // 1 of 8 days = 12.5%
        assert_eq!(completion_rate(&habit_with_logs(&[7]), today()), 13);
    }

    #[test]
    fn test_rate_future_first_log_clamps_range() {
        assert_eq!(completion_rate(&habit_with_logs(&[-3]), today()), 100);
    }

    #[test]
    fn test_breakdowns_and_totals() {
        let mut identity = Identity::new("reader", "Reader", "📘");
        identity.habits = vec![habit_with_logs(&[0, 1]), Habit::new("w", "reader", "Write")];
        let ids = vec![identity];

        let rows = habit_breakdowns(&ids, today(), false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].streak.days, 2);
        assert_eq!(rows[0].rate, 100);
        assert_eq!(rows[0].completions, 2);
        assert_eq!(rows[1].rate, 0);

        let t = totals(&ids);
        assert_eq!(t.completions, 2);
        assert_eq!(t.minutes, 20);
    }
}
