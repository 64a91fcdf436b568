//! Entity definitions: identities, habits and their completion logs.
//!
//! Values here are immutable snapshots. The mutation engine produces a new
//! collection for every change, so `PartialEq` is the change detector used by
//! persistence and reminder rescheduling.
//!
//! The serialized shape is camelCase and tolerant of older blobs: every field
//! that was added after the first release carries a serde default, and an
//! explicit `null` reads the same as a missing field.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Default target duration for a new habit, in minutes.
pub const DEFAULT_HABIT_DURATION: u32 = 15;

/// Icon used when an identity or habit has none.
pub const DEFAULT_ICON: &str = "🙂";

/// Label given to identities synthesized for habits that reference an unknown identity.
pub const PLACEHOLDER_IDENTITY_LABEL: &str = "A good habit";

/// Shared immutable collection, handed to persistence and reminders.
pub type Snapshot = Arc<Vec<Identity>>;

/// Preferred time-of-day bucket for a habit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Timing {
    Morning,
    Afternoon,
    Evening,
    Night,
    #[default]
    Anytime,
}

impl Timing {
    /// All variants in reminder order.
    pub const ALL: [Timing; 5] = [
        Timing::Morning,
        Timing::Afternoon,
        Timing::Evening,
        Timing::Night,
        Timing::Anytime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timing::Morning => "Morning",
            Timing::Afternoon => "Afternoon",
            Timing::Evening => "Evening",
            Timing::Night => "Night",
            Timing::Anytime => "Anytime",
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Timing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timing::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown timing '{s}' (expected morning, afternoon, evening, night or anytime)"
                )
            })
    }
}

/// One dated record of a habit being performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLog {
    /// Local calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Minutes actually performed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,
}

/// A recurring action tracked under an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    /// Lookup key of the owning identity. The identity owns the habit entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity_id: String,
    pub label: String,
    #[serde(default = "default_icon", deserialize_with = "icon_or_default")]
    pub icon: String,
    /// Target minutes per completion.
    #[serde(default = "default_duration", deserialize_with = "duration_or_default")]
    pub duration: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timing: Timing,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<CompletionLog>,
}

impl Habit {
    /// New habit with no history.
    pub fn new(
        id: impl Into<String>,
        identity_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            identity_id: identity_id.into(),
            label: label.into(),
            icon: default_icon(),
            duration: DEFAULT_HABIT_DURATION,
            timing: Timing::default(),
            logs: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration.max(1);
        self
    }

    /// The log recorded on `date`, if any.
    pub fn log_on(&self, date: NaiveDate) -> Option<&CompletionLog> {
        self.logs.iter().find(|l| l.date == date)
    }

    pub fn is_logged_on(&self, date: NaiveDate) -> bool {
        self.log_on(date).is_some()
    }

    /// Distinct dates with a log.
    pub fn log_dates(&self) -> BTreeSet<NaiveDate> {
        self.logs.iter().map(|l| l.date).collect()
    }

    /// Total minutes across every log.
    pub fn total_minutes(&self) -> u64 {
        self.logs.iter().map(|l| u64::from(l.duration)).sum()
    }
}

/// An aspirational self-description grouping related habits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub label: String,
    #[serde(default = "default_icon", deserialize_with = "icon_or_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub habits: Vec<Habit>,
}

impl Identity {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            habits: Vec::new(),
        }
    }

    /// Placeholder identity created when a habit references an unknown identity id.
    pub fn placeholder_for(habit: &Habit) -> Self {
        let icon = if habit.icon.trim().is_empty() {
            default_icon()
        } else {
            habit.icon.clone()
        };
        Self {
            id: habit.identity_id.clone(),
            label: PLACEHOLDER_IDENTITY_LABEL.to_string(),
            icon,
            habits: vec![habit.clone()],
        }
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }
}

/// Field overrides for [`crate::mutation::edit_habit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitPatch {
    pub label: Option<String>,
    pub timing: Option<Timing>,
    pub duration: Option<u32>,
}

/// Field overrides for [`crate::mutation::edit_identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPatch {
    pub label: Option<String>,
    pub icon: Option<String>,
}

/// Look up a habit anywhere in the collection.
pub fn find_habit<'a>(identities: &'a [Identity], habit_id: &str) -> Option<&'a Habit> {
    identities.iter().find_map(|i| i.habit(habit_id))
}

/// Every habit in identity order, then habit order.
pub fn all_habits(identities: &[Identity]) -> impl Iterator<Item = &Habit> {
    identities.iter().flat_map(|i| i.habits.iter())
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_HABIT_DURATION
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn icon_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_icon))
}

fn duration_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn legacy_habit_gets_defaults() {
        let json = r#"{"id":"read","label":"Read"}"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.timing, Timing::Anytime);
        assert!(habit.logs.is_empty());
        assert_eq!(habit.duration, DEFAULT_HABIT_DURATION);
        assert_eq!(habit.icon, DEFAULT_ICON);
        assert_eq!(habit.identity_id, "");
    }

    #[test]
    fn null_fields_read_as_missing() {
        let json = r#"{"id":"read","identityId":null,"label":"Read","icon":null,
            "duration":null,"timing":null,"logs":[{"date":"2026-10-01","duration":null}]}"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.identity_id, "");
        assert_eq!(habit.icon, DEFAULT_ICON);
        assert_eq!(habit.duration, DEFAULT_HABIT_DURATION);
        assert_eq!(habit.timing, Timing::Anytime);
        assert_eq!(habit.logs[0].duration, 0);

        let identity: Identity =
            serde_json::from_str(r#"{"id":"1","label":"Bare","icon":null,"habits":null}"#).unwrap();
        assert_eq!(identity.icon, DEFAULT_ICON);
        assert!(identity.habits.is_empty());
    }

    #[test]
    fn serialized_shape_is_camel_case() {
        let mut habit = Habit::new("read", "reader", "Read").with_timing(Timing::Evening);
        habit.logs.push(CompletionLog {
            date: date(2026, 3, 1),
            duration: 20,
        });
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["identityId"], "reader");
        assert_eq!(json["timing"], "Evening");
        assert_eq!(json["logs"][0]["date"], "2026-03-01");
    }

    #[test]
    fn stale_checked_today_is_ignored() {
        let json = r#"{"id":"read","identityId":"r","label":"Read","checkedToday":true}"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.id, "read");
    }

    #[test]
    fn timing_parses_case_insensitively() {
        assert_eq!("night".parse::<Timing>().unwrap(), Timing::Night);
        assert_eq!("MORNING".parse::<Timing>().unwrap(), Timing::Morning);
        assert!("noon".parse::<Timing>().is_err());
    }

    #[test]
    fn placeholder_identity_uses_habit_icon_or_default() {
        let habit = Habit::new("walk", "health", "Walk").with_icon("🚶");
        let identity = Identity::placeholder_for(&habit);
        assert_eq!(identity.id, "health");
        assert_eq!(identity.label, PLACEHOLDER_IDENTITY_LABEL);
        assert_eq!(identity.icon, "🚶");
        assert_eq!(identity.habits.len(), 1);

        let bare = Habit::new("walk", "health", "Walk").with_icon("");
        assert_eq!(Identity::placeholder_for(&bare).icon, DEFAULT_ICON);
    }

    #[test]
    fn with_duration_never_zero() {
        assert_eq!(Habit::new("a", "b", "c").with_duration(0).duration, 1);
    }
}
