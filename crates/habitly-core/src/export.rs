//! Portable JSON export of the whole collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{all_habits, Identity};
use crate::stats::{days_active, totals};

/// Bumped whenever the document shape changes incompatibly.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub identities: usize,
    pub habits: usize,
    pub completions: usize,
    pub minutes: u64,
    pub days_active: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub summary: ExportSummary,
    /// Same shape as the persisted blob.
    pub identities: Vec<Identity>,
}

impl ExportDocument {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn build_export(identities: &[Identity], exported_at: DateTime<Utc>) -> ExportDocument {
    let totals = totals(identities);
    ExportDocument {
        format_version: EXPORT_FORMAT_VERSION,
        exported_at,
        summary: ExportSummary {
            identities: identities.len(),
            habits: all_habits(identities).count(),
            completions: totals.completions,
            minutes: totals.minutes,
            days_active: days_active(identities),
        },
        identities: identities.to_vec(),
    }
}
