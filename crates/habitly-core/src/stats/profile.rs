use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{all_habits, Identity};

/// Headline counts shown on the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub identities: usize,
    pub habits: usize,
    pub days_active: usize,
}

/// Distinct calendar days on which at least one habit was logged.
pub fn days_active(identities: &[Identity]) -> usize {
    all_habits(identities)
        .flat_map(|h| h.logs.iter().map(|l| l.date))
        .collect::<BTreeSet<NaiveDate>>()
        .len()
}

pub fn profile_summary(identities: &[Identity]) -> ProfileSummary {
    ProfileSummary {
        identities: identities.len(),
        habits: all_habits(identities).count(),
        days_active: days_active(identities),
    }
}
