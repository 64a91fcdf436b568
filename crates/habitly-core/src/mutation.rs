//! Pure transformations of the identity collection.
//!
//! Every operation borrows the current collection and returns a new one. None
//! of them fail: out-of-range input saturates (a zero duration target becomes
//! one minute, a blank label override is ignored) and references to unknown
//! ids are no-ops. The exception is [`reorder_habits`], which rejects any
//! payload that is not an exact permutation so a habit can never be dropped.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::ValidationError;
use crate::model::{find_habit, CompletionLog, Habit, HabitPatch, Identity, IdentityPatch};

/// Append an identity; no-op if its id is already present.
pub fn add_identity(identities: &[Identity], identity: Identity) -> Vec<Identity> {
    if identities.iter().any(|i| i.id == identity.id) {
        debug!(identity_id = %identity.id, "identity already exists");
        return identities.to_vec();
    }
    let mut next = identities.to_vec();
    next.push(identity);
    next
}

/// Append a habit to its identity, synthesizing a placeholder identity when
/// `habit.identity_id` is unknown. Habit ids are global: a duplicate id is a no-op.
pub fn add_habit(identities: &[Identity], habit: Habit) -> Vec<Identity> {
    if find_habit(identities, &habit.id).is_some() {
        debug!(habit_id = %habit.id, "habit already exists");
        return identities.to_vec();
    }

    let mut next = identities.to_vec();
    match next.iter_mut().find(|i| i.id == habit.identity_id) {
        Some(identity) => identity.habits.push(habit),
        None => {
            debug!(identity_id = %habit.identity_id, "creating placeholder identity");
            next.push(Identity::placeholder_for(&habit));
        }
    }
    next
}

/// Record `duration` minutes for `today`, replacing any existing entry for
/// that date. An unknown habit is added first (creating its identity if needed).
pub fn log_completion(
    identities: &[Identity],
    habit: &Habit,
    duration: u32,
    today: NaiveDate,
) -> Vec<Identity> {
    let log = CompletionLog {
        date: today,
        duration,
    };

    if find_habit(identities, &habit.id).is_none() {
        let mut fresh = habit.clone();
        upsert_log(&mut fresh.logs, log);
        return add_habit(identities, fresh);
    }

    map_habit(identities, &habit.id, |h| upsert_log(&mut h.logs, log.clone()))
}

/// Remove the log for `today`, if any.
pub fn undo_completion(identities: &[Identity], habit: &Habit, today: NaiveDate) -> Vec<Identity> {
    map_habit(identities, &habit.id, |h| h.logs.retain(|l| l.date != today))
}

/// Merge label/timing/duration overrides into the habit with `habit_id`.
pub fn edit_habit(identities: &[Identity], habit_id: &str, patch: &HabitPatch) -> Vec<Identity> {
    map_habit(identities, habit_id, |h| {
        if let Some(label) = patch.label.as_deref().map(str::trim) {
            if !label.is_empty() {
                h.label = label.to_string();
            }
        }
        if let Some(timing) = patch.timing {
            h.timing = timing;
        }
        if let Some(duration) = patch.duration {
            h.duration = duration.max(1);
        }
    })
}

/// Remove the habit from whichever identity holds it.
pub fn delete_habit(identities: &[Identity], habit_id: &str) -> Vec<Identity> {
    identities
        .iter()
        .map(|identity| {
            let mut identity = identity.clone();
            identity.habits.retain(|h| h.id != habit_id);
            identity
        })
        .collect()
}

/// Merge label/icon overrides into the identity with `identity_id`.
pub fn edit_identity(
    identities: &[Identity],
    identity_id: &str,
    patch: &IdentityPatch,
) -> Vec<Identity> {
    identities
        .iter()
        .map(|identity| {
            let mut identity = identity.clone();
            if identity.id == identity_id {
                if let Some(label) = patch.label.as_deref().map(str::trim) {
                    if !label.is_empty() {
                        identity.label = label.to_string();
                    }
                }
                if let Some(icon) = &patch.icon {
                    identity.icon = icon.clone();
                }
            }
            identity
        })
        .collect()
}

/// Remove an identity together with all of its habits.
pub fn delete_identity(identities: &[Identity], identity_id: &str) -> Vec<Identity> {
    identities
        .iter()
        .filter(|i| i.id != identity_id)
        .cloned()
        .collect()
}

/// Rearrange one identity's habits into `ordered_ids` order.
///
/// # Errors
///
/// Returns [`ValidationError::ReorderMismatch`] unless `ordered_ids` holds
/// exactly the identity's current habit ids, each once.
pub fn reorder_habits<S: AsRef<str>>(
    identities: &[Identity],
    identity_id: &str,
    ordered_ids: &[S],
) -> Result<Vec<Identity>, ValidationError> {
    let Some(identity) = identities.iter().find(|i| i.id == identity_id) else {
        return Ok(identities.to_vec());
    };

    let current: HashSet<&str> = identity.habits.iter().map(|h| h.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicated = Vec::new();
    let mut unexpected = Vec::new();
    for id in ordered_ids.iter().map(|s| s.as_ref()) {
        if !seen.insert(id) {
            duplicated.push(id.to_string());
        } else if !current.contains(id) {
            unexpected.push(id.to_string());
        }
    }
    let missing: Vec<String> = identity
        .habits
        .iter()
        .filter(|h| !seen.contains(h.id.as_str()))
        .map(|h| h.id.clone())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() || !duplicated.is_empty() {
        return Err(ValidationError::ReorderMismatch {
            identity_id: identity_id.to_string(),
            missing,
            unexpected,
            duplicated,
        });
    }

    let mut by_id: HashMap<&str, &Habit> =
        identity.habits.iter().map(|h| (h.id.as_str(), h)).collect();
    let reordered: Vec<Habit> = ordered_ids
        .iter()
        .filter_map(|id| by_id.remove(id.as_ref()).cloned())
        .collect();

    Ok(identities
        .iter()
        .map(|i| {
            if i.id == identity_id {
                Identity {
                    habits: reordered.clone(),
                    ..i.clone()
                }
            } else {
                i.clone()
            }
        })
        .collect())
}

fn upsert_log(logs: &mut Vec<CompletionLog>, log: CompletionLog) {
    match logs.iter_mut().find(|l| l.date == log.date) {
        Some(existing) => *existing = log,
        None => logs.push(log),
    }
}

fn map_habit<F>(identities: &[Identity], habit_id: &str, mut f: F) -> Vec<Identity>
where
    F: FnMut(&mut Habit),
{
    identities
        .iter()
        .map(|identity| {
            let mut identity = identity.clone();
            for habit in identity.habits.iter_mut().filter(|h| h.id == habit_id) {
                f(habit);
            }
            identity
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Timing, PLACEHOLDER_IDENTITY_LABEL};
    use crate::stats::habit_streak;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn sample() -> Vec<Identity> {
        let mut reader = Identity::new("reader", "Reader", "📘");
        reader.habits.push(Habit::new("read", "reader", "Read"));
        reader.habits.push(Habit::new("journal", "reader", "Journal"));
        reader.habits.push(Habit::new("review", "reader", "Review notes"));
        let mut fit = Identity::new("fit", "Fitness", "💪");
        fit.habits.push(Habit::new("walk", "fit", "Walk"));
        vec![reader, fit]
    }

    #[test]
    fn add_identity_is_noop_for_existing_id() {
        let ids = sample();
        let next = add_identity(&ids, Identity::new("reader", "Other", "x"));
        assert_eq!(next, ids);

        let next = add_identity(&ids, Identity::new("calm", "Calm", "🧘"));
        assert_eq!(next.len(), 3);
        assert_eq!(next[2].id, "calm");
    }

    #[test]
    fn add_habit_appends_to_existing_identity() {
        let next = add_habit(&sample(), Habit::new("stretch", "fit", "Stretch"));
        assert_eq!(next[1].habits.len(), 2);
        assert_eq!(next[1].habits[1].id, "stretch");
    }

    #[test]
    fn add_habit_creates_placeholder_identity() {
        let next = add_habit(&sample(), Habit::new("sleep", "rest", "Sleep 8h"));
        assert_eq!(next.len(), 3);
        assert_eq!(next[2].id, "rest");
        assert_eq!(next[2].label, PLACEHOLDER_IDENTITY_LABEL);
        assert_eq!(next[2].habits[0].id, "sleep");
    }

    #[test]
    fn add_habit_ignores_duplicate_global_id() {
        let ids = sample();
        let next = add_habit(&ids, Habit::new("walk", "reader", "Walk again"));
        assert_eq!(next, ids);
    }

    #[test]
    fn log_twice_same_day_keeps_latest() {
        let ids = sample();
        let habit = ids[0].habits[0].clone();
        let once = log_completion(&ids, &habit, 10, day(3));
        let twice = log_completion(&once, &habit, 25, day(3));
        let logs = &twice[0].habits[0].logs;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].duration, 25);
    }

    #[test]
    fn log_keeps_previous_days() {
        let ids = sample();
        let habit = ids[0].habits[0].clone();
        let a = log_completion(&ids, &habit, 10, day(3));
        let b = log_completion(&a, &habit, 12, day(4));
        assert_eq!(b[0].habits[0].logs.len(), 2);
    }

    #[test]
    fn log_unknown_habit_creates_identity_and_log() {
        let ids = sample();
        let habit = Habit::new("meditate", "calm", "Meditate");
        let next = log_completion(&ids, &habit, 5, day(3));
        let created = next.iter().find(|i| i.id == "calm").unwrap();
        assert_eq!(created.habits[0].logs.len(), 1);
        assert_eq!(created.habits[0].logs[0].duration, 5);
    }

    #[test]
    fn undo_removes_only_today() {
        let ids = sample();
        let habit = ids[0].habits[0].clone();
        let a = log_completion(&ids, &habit, 10, day(3));
        let b = log_completion(&a, &habit, 10, day(4));
        let undone = undo_completion(&b, &habit, day(4));
        assert_eq!(undone[0].habits[0].logs.len(), 1);
        assert_eq!(undone[0].habits[0].logs[0].date, day(3));

        // Nothing logged today: no-op.
        assert_eq!(undo_completion(&undone, &habit, day(4)), undone);
    }

    #[test]
    fn edit_habit_merges_overrides() {
        let patch = HabitPatch {
            label: Some("  Read fiction ".into()),
            timing: Some(Timing::Night),
            duration: Some(0),
        };
        let next = edit_habit(&sample(), "read", &patch);
        let read = &next[0].habits[0];
        assert_eq!(read.label, "Read fiction");
        assert_eq!(read.timing, Timing::Night);
        assert_eq!(read.duration, 1);
        assert_eq!(next[0].habits[1], sample()[0].habits[1]);
    }

    #[test]
    fn edit_habit_ignores_blank_label() {
        let patch = HabitPatch {
            label: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(edit_habit(&sample(), "read", &patch), sample());
    }

    #[test]
    fn delete_habit_and_identity() {
        let next = delete_habit(&sample(), "journal");
        assert_eq!(next[0].habits.len(), 2);
        assert!(find_habit(&next, "journal").is_none());

        let next = delete_identity(&sample(), "reader");
        assert_eq!(next.len(), 1);
        assert!(find_habit(&next, "read").is_none());
    }

    #[test]
    fn delete_habit_leaves_other_streaks_unchanged() {
        let mut ids = sample();
        for d in [10, 11, 12, 14, 15] {
            for habit_id in ["read", "journal"] {
                let habit = find_habit(&ids, habit_id).unwrap().clone();
                ids = log_completion(&ids, &habit, 10, day(d));
            }
        }
        let read_before = find_habit(&ids, "read").unwrap().clone();
        let strict = habit_streak(&read_before, day(15), false);
        let lenient = habit_streak(&read_before, day(15), true);
        assert_eq!(strict.days, 2);
        assert_eq!(lenient.days, 6);

        let next = delete_habit(&ids, "journal");
        let read_after = find_habit(&next, "read").unwrap();
        assert_eq!(read_after, &read_before);
        assert_eq!(habit_streak(read_after, day(15), false), strict);
        assert_eq!(habit_streak(read_after, day(15), true), lenient);
    }

    #[test]
    fn edit_identity_merges_label_and_icon() {
        let patch = IdentityPatch {
            label: Some("Bookworm".into()),
            icon: Some("📚".into()),
        };
        let next = edit_identity(&sample(), "reader", &patch);
        assert_eq!(next[0].label, "Bookworm");
        assert_eq!(next[0].icon, "📚");
        assert_eq!(next[1], sample()[1]);
    }

    #[test]
    fn reorder_accepts_permutation() {
        let next = reorder_habits(&sample(), "reader", &["review", "read", "journal"]).unwrap();
        let order: Vec<&str> = next[0].habits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(order, vec!["review", "read", "journal"]);
    }

    #[test]
    fn reorder_rejects_missing_id() {
        let err = reorder_habits(&sample(), "reader", &["review", "read"]).unwrap_err();
        match err {
            ValidationError::ReorderMismatch { missing, .. } => {
                assert_eq!(missing, vec!["journal".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reorder_rejects_duplicates_and_strangers() {
        let err =
            reorder_habits(&sample(), "reader", &["read", "read", "journal", "walk"]).unwrap_err();
        match err {
            ValidationError::ReorderMismatch {
                missing,
                unexpected,
                duplicated,
                ..
            } => {
                assert_eq!(missing, vec!["review".to_string()]);
                assert_eq!(unexpected, vec!["walk".to_string()]);
                assert_eq!(duplicated, vec!["read".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reorder_unknown_identity_is_noop() {
        let ids = sample();
        assert_eq!(reorder_habits(&ids, "ghost", &["x"]).unwrap(), ids);
    }
}
