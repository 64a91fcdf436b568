//! Trailing seven-day bar data and summary.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{all_habits, Identity};

/// Number of days in the weekly window.
pub const WEEK_DAYS: usize = 7;

/// One bar of the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBar {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub label: String,
    /// Logs across all habits on this date.
    pub count: usize,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub total_completions: usize,
    /// `round(100 * completions / (habits * 7))`, 0 without habits.
    pub rate: u32,
    /// Day with the most logs; earliest wins ties. `None` for an empty week.
    pub best_day: Option<DayBar>,
    pub total_minutes: u64,
}

/// Bars plus summary for the week ending today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekReport {
    pub days: Vec<DayBar>,
    pub summary: WeeklySummary,
}

/// Seven bars, oldest first, ending at `today`.
pub fn week_bars(identities: &[Identity], today: NaiveDate) -> Vec<DayBar> {
    let mut per_day: HashMap<NaiveDate, (usize, u64)> = HashMap::new();
    for log in all_habits(identities).flat_map(|h| h.logs.iter()) {
        let entry = per_day.entry(log.date).or_default();
        entry.0 += 1;
        entry.1 += u64::from(log.duration);
    }

    (0..WEEK_DAYS as i64)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let (count, minutes) = per_day.get(&date).copied().unwrap_or_default();
            DayBar {
                date,
                label: date.format("%a").to_string(),
                count,
                minutes,
            }
        })
        .collect()
}

/// Summarize bars produced by [`week_bars`] for a collection of `habit_count` habits.
pub fn summarize_week(days: &[DayBar], habit_count: usize) -> WeeklySummary {
    let total_completions: usize = days.iter().map(|d| d.count).sum();
    let total_minutes: u64 = days.iter().map(|d| d.minutes).sum();

    let rate = if habit_count == 0 {
        0
    } else {
        let possible = (habit_count * WEEK_DAYS) as f64;
        (100.0 * total_completions as f64 / possible).round() as u32
    };

    // Ties keep the earlier day.
    let best_day = days
        .iter()
        .filter(|d| d.count > 0)
        .fold(None::<&DayBar>, |best, day| match best {
            Some(b) if b.count >= day.count => Some(b),
            _ => Some(day),
        })
        .cloned();

    WeeklySummary {
        total_completions,
        rate,
        best_day,
        total_minutes,
    }
}

pub fn week_report(identities: &[Identity], today: NaiveDate) -> WeekReport {
    let days = week_bars(identities, today);
    let habit_count = all_habits(identities).count();
    let summary = summarize_week(&days, habit_count);
    WeekReport { days, summary }
}
