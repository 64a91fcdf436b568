//! Month calendar of completions and per-day detail.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::Identity;

/// One day cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub count: usize,
    /// 0 = nothing, 1, 2, 3 = three or more completions.
    pub intensity: u8,
}

/// A calendar month of completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthHistory {
    pub year: i32,
    pub month: u32,
    /// e.g. "October 2026".
    pub label: String,
    /// Empty cells before the 1st in a Sunday-first week grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
    pub total: usize,
}

/// A completion on a specific date, with the habit it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLogEntry {
    pub habit_id: String,
    pub habit_label: String,
    pub habit_icon: String,
    pub duration: u32,
}

/// Grid shade for a day with `count` completions.
pub fn intensity(count: usize) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => 3,
    }
}

/// The month `offset` months before (negative) the month containing `today`.
/// Positive offsets are clamped to the current month; there is no history in
/// the future. An offset reaching past the calendar's range also falls back to
/// the current month.
pub fn month_history(identities: &[Identity], today: NaiveDate, offset: i32) -> MonthHistory {
    let current = today.with_day(1).unwrap_or(today);
    let first = month_start(current, offset.min(0)).unwrap_or(current);
    let (year, month) = (first.year(), first.month());
    let days_in_month = days_in_month(first);

    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for identity in identities {
        for log in identity.habits.iter().flat_map(|h| h.logs.iter()) {
            if log.date.year() == year && log.date.month() == month {
                *counts.entry(log.date).or_default() += 1;
            }
        }
    }

    let days: Vec<CalendarDay> = (0..days_in_month)
        .map(|i| {
            let date = first + Duration::days(i64::from(i));
            let count = counts.get(&date).copied().unwrap_or(0);
            CalendarDay {
                date,
                day: i + 1,
                count,
                intensity: intensity(count),
            }
        })
        .collect();

    MonthHistory {
        year,
        month,
        label: first.format("%B %Y").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        total: days.iter().map(|d| d.count).sum(),
        days,
    }
}

/// Every completion recorded on `date`, in collection order.
pub fn logs_on(identities: &[Identity], date: NaiveDate) -> Vec<DayLogEntry> {
    identities
        .iter()
        .flat_map(|i| i.habits.iter())
        .filter_map(|habit| {
            habit.log_on(date).map(|log| DayLogEntry {
                habit_id: habit.id.clone(),
                habit_label: habit.label.clone(),
                habit_icon: habit.icon.clone(),
                duration: log.duration,
            })
        })
        .collect()
}

/// First day of the month `offset` months away from `first`'s month.
fn month_start(first: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let index = i64::from(first.year()) * 12 + i64::from(first.month0()) + i64::from(offset);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn days_in_month(first: NaiveDate) -> u32 {
    month_start(first, 1)
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompletionLog, Habit};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn collection() -> Vec<Identity> {
        let mut read = Habit::new("read", "r", "Read").with_icon("📘");
        let mut walk = Habit::new("walk", "r", "Walk").with_icon("🚶");
        read.logs = vec![
            CompletionLog {
                date: date(2026, 10, 1),
                duration: 10,
            },
            CompletionLog {
                date: date(2026, 10, 2),
                duration: 20,
            },
            CompletionLog {
                date: date(2026, 9, 30),
                duration: 5,
            },
        ];
        walk.logs = vec![CompletionLog {
            date: date(2026, 10, 2),
            duration: 30,
        }];
        let mut identity = Identity::new("r", "R", "x");
        identity.habits = vec![read, walk];
        vec![identity]
    }

    #[test]
    fn test_current_month_grid() {
        let history = month_history(&collection(), date(2026, 10, 19), 0);
        assert_eq!(history.label, "October 2026");
        assert_eq!(history.days.len(), 31);
        // 2026-10-01 is a Thursday
        assert_eq!(history.leading_blanks, 4);
        assert_eq!(history.total, 3);
        assert_eq!(history.days[1].count, 2);
        assert_eq!(history.days[1].intensity, 2);
        assert_eq!(history.days[0].intensity, 1);
        assert_eq!(history.days[5].intensity, 0);
    }

    #[test]
    fn test_previous_month_and_year_wrap() {
        let history = month_history(&collection(), date(2026, 10, 19), -1);
        assert_eq!((history.year, history.month), (2026, 9));
        assert_eq!(history.days.len(), 30);
        assert_eq!(history.total, 1);

        let history = month_history(&[], date(2026, 1, 5), -1);
        assert_eq!((history.year, history.month), (2025, 12));

        let leap = month_history(&[], date(2028, 3, 5), -1);
        assert_eq!(leap.days.len(), 29);
    }

    #[test]
    fn test_future_offset_is_clamped() {
        let history = month_history(&[], date(2026, 10, 19), 3);
        assert_eq!((history.year, history.month), (2026, 10));
    }

    #[test]
    fn test_offset_beyond_calendar_falls_back_to_current_month() {
        for offset in [-4_000_000, i32::MIN] {
            let history = month_history(&collection(), date(2026, 10, 19), offset);
            assert_eq!((history.year, history.month), (2026, 10));
            assert_eq!(history.label, "October 2026");
            assert_eq!(history.days[0].date, date(2026, 10, 1));
            assert_eq!(history.total, 3);
        }
    }

    #[test]
    fn test_logs_on_date() {
        let entries = logs_on(&collection(), date(2026, 10, 2));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].habit_label, "Read");
        assert_eq!(entries[0].duration, 20);
        assert_eq!(entries[1].habit_icon, "🚶");
        assert!(logs_on(&collection(), date(2026, 10, 3)).is_empty());
    }

    #[test]
    fn test_intensity_levels() {
        assert_eq!(intensity(0), 0);
        assert_eq!(intensity(1), 1);
        assert_eq!(intensity(2), 2);
        assert_eq!(intensity(7), 3);
    }
}
