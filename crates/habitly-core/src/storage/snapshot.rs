//! Whole-collection load and save.
//!
//! Blobs written by older releases are accepted: serde defaults fill in
//! missing fields and [`repair`] restores the invariants the rest of the
//! engine relies on.

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::Result;
use crate::model::{CompletionLog, Identity};

/// Key under which the collection blob lives.
pub const STORAGE_KEY: &str = "identities";

/// Load the collection. A missing key (or a `null` blob) is an empty collection.
///
/// # Errors
/// Storage failures and blobs that are not a JSON collection at all. A corrupt
/// blob is reported rather than treated as empty so it is never overwritten.
pub fn load_identities(store: &dyn KeyValueStore) -> Result<Vec<Identity>> {
    let Some(blob) = store.get(STORAGE_KEY)? else {
        debug!("no stored collection, starting empty");
        return Ok(Vec::new());
    };

    let parsed: Option<Vec<Identity>> = serde_json::from_str(&blob).map_err(|e| {
        warn!(error = %e, "stored collection is not valid JSON");
        e
    })?;

    Ok(repair(parsed.unwrap_or_default()))
}

/// Serialize and write the whole collection.
pub fn save_identities(store: &dyn KeyValueStore, identities: &[Identity]) -> Result<()> {
    let blob = serde_json::to_string(identities)?;
    store.set(STORAGE_KEY, &blob)?;
    debug!(identities = identities.len(), bytes = blob.len(), "collection saved");
    Ok(())
}

/// Normalize a freshly deserialized collection.
///
/// - habits with an empty `identityId` take the owning identity's id;
/// - a zero target duration becomes 1;
/// - several logs on the same date collapse to the last one, kept at the
///   position of the first.
pub fn repair(identities: Vec<Identity>) -> Vec<Identity> {
    identities
        .into_iter()
        .map(|mut identity| {
            for habit in &mut identity.habits {
                if habit.identity_id.trim().is_empty() {
                    habit.identity_id = identity.id.clone();
                }
                habit.duration = habit.duration.max(1);
                habit.logs = dedupe_logs(std::mem::take(&mut habit.logs));
            }
            identity
        })
        .collect()
}

fn dedupe_logs(logs: Vec<CompletionLog>) -> Vec<CompletionLog> {
    let mut out: Vec<CompletionLog> = Vec::with_capacity(logs.len());
    for log in logs {
        match out.iter_mut().find(|l| l.date == log.date) {
            Some(existing) => *existing = log,
            None => out.push(log),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::{Timing, DEFAULT_HABIT_DURATION, DEFAULT_ICON};
    use crate::storage::MemoryStore;

    const LEGACY_BLOB: &str = r#"[
        {
            "id": "1",
            "label": "Fitness Enthusiast",
            "icon": "💪",
            "habits": [
                {"id": "sleep", "label": "Sleep over 8h", "checkedToday": true},
                {
                    "id": "meal",
                    "identityId": "1",
                    "label": "Have a healthy meal",
                    "icon": "🍽️",
                    "timing": "Evening",
                    "duration": 0,
                    "logs": [
                        {"date": "2026-10-01", "duration": 10},
                        {"date": "2026-10-02", "duration": 5},
                        {"date": "2026-10-01", "duration": 30}
                    ]
                }
            ]
        },
        {"id": "2", "label": "Bare"}
    ]"#;

    #[test]
    fn missing_key_loads_empty() {
        let store = MemoryStore::new();
        assert!(load_identities(&store).unwrap().is_empty());
    }

    #[test]
    fn null_blob_loads_empty() {
        let store = MemoryStore::with_entry(STORAGE_KEY, "null");
        assert!(load_identities(&store).unwrap().is_empty());
    }

    #[test]
    fn legacy_blob_is_repaired() {
        let store = MemoryStore::with_entry(STORAGE_KEY, LEGACY_BLOB);
        let ids = load_identities(&store).unwrap();
        assert_eq!(ids.len(), 2);

        let sleep = &ids[0].habits[0];
        assert_eq!(sleep.identity_id, "1");
        assert_eq!(sleep.timing, Timing::Anytime);
        assert_eq!(sleep.duration, DEFAULT_HABIT_DURATION);
        assert_eq!(sleep.icon, DEFAULT_ICON);
        assert!(sleep.logs.is_empty());

        let meal = &ids[0].habits[1];
        assert_eq!(meal.duration, 1);
        assert_eq!(meal.logs.len(), 2);
        assert_eq!(meal.logs[0].date.to_string(), "2026-10-01");
        assert_eq!(meal.logs[0].duration, 30);

        assert_eq!(ids[1].icon, DEFAULT_ICON);
        assert!(ids[1].habits.is_empty());
    }

    #[test]
    fn null_fields_are_repaired() {
        let blob = r#"[{"id":"1","label":"Fitness","icon":null,"habits":[
            {"id":"h","identityId":null,"label":"Stretch","duration":null,"timing":null,
             "checkedToday":null,"logs":[{"date":"2026-10-01","duration":null}]}
        ]},{"id":"2","label":"Bare","habits":null}]"#;
        let store = MemoryStore::with_entry(STORAGE_KEY, blob);
        let ids = load_identities(&store).unwrap();

        assert_eq!(ids[0].icon, DEFAULT_ICON);
        let habit = &ids[0].habits[0];
        assert_eq!(habit.identity_id, "1");
        assert_eq!(habit.duration, DEFAULT_HABIT_DURATION);
        assert_eq!(habit.timing, Timing::Anytime);
        assert_eq!(habit.logs.len(), 1);
        assert_eq!(habit.logs[0].duration, 0);
        assert!(ids[1].habits.is_empty());
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        let store = MemoryStore::with_entry(STORAGE_KEY, "{not json");
        assert!(matches!(load_identities(&store), Err(CoreError::Json(_))));
    }

    #[test]
    fn save_then_load_is_identity() {
        let store = MemoryStore::with_entry(STORAGE_KEY, LEGACY_BLOB);
        let ids = load_identities(&store).unwrap();
        save_identities(&store, &ids).unwrap();
        assert_eq!(load_identities(&store).unwrap(), ids);
        let blob = store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(blob.contains("\"identityId\""));
        assert!(!blob.contains("checkedToday"));
    }
}
