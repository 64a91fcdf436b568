//! Read-time projection of the collection.
//!
//! `checked_today` is never stored. It is evaluated against the date passed in
//! on every read, which is what keeps it correct across local midnight.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{all_habits, Habit, Identity};

/// A habit plus its derived status for the day.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView<'a> {
    #[serde(flatten)]
    pub habit: &'a Habit,
    pub checked_today: bool,
}

/// An identity whose habits carry derived status.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityView<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub icon: &'a str,
    pub habits: Vec<HabitView<'a>>,
}

impl IdentityView<'_> {
    /// Number of habits already done today.
    pub fn checked_count(&self) -> usize {
        self.habits.iter().filter(|h| h.checked_today).count()
    }
}

/// True iff the habit has a log dated `today`.
pub fn checked_on(habit: &Habit, today: NaiveDate) -> bool {
    habit.is_logged_on(today)
}

pub fn enrich_habit(habit: &Habit, today: NaiveDate) -> HabitView<'_> {
    HabitView {
        habit,
        checked_today: checked_on(habit, today),
    }
}

/// Project the whole collection for `today`.
pub fn enrich(identities: &[Identity], today: NaiveDate) -> Vec<IdentityView<'_>> {
    identities
        .iter()
        .map(|identity| IdentityView {
            id: &identity.id,
            label: &identity.label,
            icon: &identity.icon,
            habits: identity
                .habits
                .iter()
                .map(|h| enrich_habit(h, today))
                .collect(),
        })
        .collect()
}

/// `(done, total)` habits for `today` across every identity.
pub fn daily_progress(identities: &[Identity], today: NaiveDate) -> (usize, usize) {
    all_habits(identities).fold((0, 0), |(done, total), habit| {
        (done + usize::from(checked_on(habit, today)), total + 1)
    })
}
