//! Day streaks with optional grace days.
//!
//! The walk starts at today and moves one calendar day back at a time, for at
//! most [`STREAK_WINDOW_DAYS`] days. Without grace it counts consecutive logged
//! days and stops at the first gap.
//!
//! With grace a single missed day may be bridged, but only when it is
//! surrounded by activity: a logged day must exist on both its newer and its
//! older side. Two consecutive misses end the walk. Concretely:
//!
//! - a miss between two logged days is a rest day and counts into the streak;
//! - a miss at the far end of the walk (the streak ran out there) is dropped;
//! - a miss on today itself (not logged yet) is neither credited nor fatal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{all_habits, Habit, Identity};

/// Maximum number of days the walk inspects.
pub const STREAK_WINDOW_DAYS: u32 = 365;

/// Result of a streak walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Credited days, rest days included.
    pub days: u32,
    /// Missed days bridged by grace.
    pub rest_days: u32,
}

/// Walk backward from `today` over `log_dates`.
pub fn calc_streak(log_dates: &BTreeSet<NaiveDate>, today: NaiveDate, allow_grace: bool) -> Streak {
    let mut streak = Streak::default();
    let mut pending_miss = 0;
    let mut seen_logged_day = false;
    let mut date = today;

    for _ in 0..STREAK_WINDOW_DAYS {
        if log_dates.contains(&date) {
            if seen_logged_day && pending_miss > 0 {
                streak.days += pending_miss;
                streak.rest_days += pending_miss;
            }
            pending_miss = 0;
            seen_logged_day = true;
            streak.days += 1;
        } else {
            pending_miss += 1;
            if !allow_grace || pending_miss > 1 {
                break;
            }
        }

        match date.pred_opt() {
            Some(prev) => date = prev,
            None => break,
        }
    }

    streak
}

/// Streak of a single habit.
pub fn habit_streak(habit: &Habit, today: NaiveDate, allow_grace: bool) -> Streak {
    calc_streak(&habit.log_dates(), today, allow_grace)
}

/// Streak of days on which at least one habit was logged.
pub fn overall_streak(identities: &[Identity], today: NaiveDate, allow_grace: bool) -> Streak {
    let dates: BTreeSet<NaiveDate> = all_habits(identities)
        .flat_map(|h| h.logs.iter().map(|l| l.date))
        .collect();
    calc_streak(&dates, today, allow_grace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    /// Dates at the given offsets (days before today).
    fn ago(offsets: &[i64]) -> BTreeSet<NaiveDate> {
        offsets
            .iter()
            .map(|d| today() - Duration::days(*d))
            .collect()
    }

    fn streak(days: u32, rest_days: u32) -> Streak {
        Streak { days, rest_days }
    }

    #[test]
    fn test_no_grace_counts_until_first_gap() {
        assert_eq!(calc_streak(&ago(&[0, 1, 2]), today(), false), streak(3, 0));
        assert_eq!(calc_streak(&ago(&[0, 1, 2, 4, 5]), today(), false), streak(3, 0));
    }

    #[test]
    fn test_no_grace_unlogged_today_is_zero() {
        assert_eq!(calc_streak(&ago(&[1, 2, 3]), today(), false), streak(0, 0));
    }

    #[test]
    fn test_grace_bridges_surrounded_miss() {
        assert_eq!(calc_streak(&ago(&[0, 2, 3]), today(), true), streak(4, 1));
    }

    #[test]
    fn test_grace_ignores_leading_miss_on_today() {
        assert_eq!(calc_streak(&ago(&[1, 2]), today(), true), streak(2, 0));
    }

    #[test]
    fn test_grace_drops_trailing_miss() {
        // -3 is missed and nothing older is logged.
        assert_eq!(calc_streak(&ago(&[0, 1, 2]), today(), true), streak(3, 0));
    }

    #[test]
    fn test_grace_bridges_several_isolated_misses() {
        assert_eq!(calc_streak(&ago(&[0, 2, 4, 5]), today(), true), streak(6, 2));
    }

    #[test]
    fn test_grace_two_consecutive_misses_break() {
        assert_eq!(calc_streak(&ago(&[0, 3, 4]), today(), true), streak(1, 0));
    }

    #[test]
    fn test_grace_leading_and_inner_miss() {
        // today missed, -1 logged, -2 missed, -3 logged
        assert_eq!(calc_streak(&ago(&[1, 3]), today(), true), streak(3, 1));
    }

    #[test]
    fn test_grace_without_logs_is_zero() {
        assert_eq!(calc_streak(&BTreeSet::new(), today(), true), streak(0, 0));
    }

    #[test]
    fn test_future_logs_are_ignored() {
        assert_eq!(calc_streak(&ago(&[-1, 0]), today(), false), streak(1, 0));
    }

    #[test]
    fn test_window_caps_the_walk() {
        let every_day: Vec<i64> = (0..400).collect();
        let s = calc_streak(&ago(&every_day), today(), false);
        assert_eq!(s.days, STREAK_WINDOW_DAYS);
    }

    #[test]
    fn test_overall_streak_unions_habits() {
        let mut a = Habit::new("a", "i", "A");
        let mut b = Habit::new("b", "i", "B");
        for (habit, offsets) in [(&mut a, [0_i64, 2]), (&mut b, [1, 3])] {
            for d in offsets {
                habit.logs.push(crate::model::CompletionLog {
                    date: today() - Duration::days(d),
                    duration: 5,
                });
            }
        }
        let mut identity = Identity::new("i", "I", "x");
        identity.habits = vec![a.clone(), b];
        assert_eq!(overall_streak(&[identity], today(), false), streak(4, 0));
        assert_eq!(habit_streak(&a, today(), false), streak(1, 0));
    }
}
