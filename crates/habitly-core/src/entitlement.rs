//! Free vs. premium gating, applied by callers.
//!
//! The engine never asks about the plan. Callers check limits here before
//! issuing a mutation and pass derived flags (such as `allow_grace`) down.

use crate::error::EntitlementError;
use crate::model::{all_habits, Identity};

/// Entitlement identifier of the premium plan.
pub const PRO_ENTITLEMENT_ID: &str = "Habitly Pro";

pub const FREE_IDENTITY_LIMIT: usize = 3;
pub const FREE_HABIT_LIMIT: usize = 5;

/// Purchase collaborator.
pub trait Entitlement: Send + Sync {
    fn is_entitled(&self) -> bool;

    /// Start the purchase flow.
    fn request_upgrade(&self) -> Result<(), EntitlementError> {
        Err(EntitlementError::UpgradeFailed(
            "no purchase flow available".to_string(),
        ))
    }
}

/// Entitlement fixed at construction, e.g. from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticEntitlement {
    entitled: bool,
}

impl StaticEntitlement {
    pub fn new(entitled: bool) -> Self {
        Self { entitled }
    }
}

impl Entitlement for StaticEntitlement {
    fn is_entitled(&self) -> bool {
        self.entitled
    }
}

/// Features that need the premium plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PremiumFeature {
    GraceDays,
    CustomReminderHours,
    DataExport,
}

impl PremiumFeature {
    pub fn name(&self) -> &'static str {
        match self {
            PremiumFeature::GraceDays => "grace days",
            PremiumFeature::CustomReminderHours => "custom reminder hours",
            PremiumFeature::DataExport => "data export",
        }
    }
}

/// Item counts allowed on the current plan. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub identities: Option<usize>,
    pub habits: Option<usize>,
}

impl PlanLimits {
    pub const FREE: PlanLimits = PlanLimits {
        identities: Some(FREE_IDENTITY_LIMIT),
        habits: Some(FREE_HABIT_LIMIT),
    };

    pub const UNLIMITED: PlanLimits = PlanLimits {
        identities: None,
        habits: None,
    };

    pub fn for_entitlement(entitlement: &dyn Entitlement) -> Self {
        if entitlement.is_entitled() {
            Self::UNLIMITED
        } else {
            Self::FREE
        }
    }
}

/// Fails when one more identity would exceed the plan.
pub fn check_add_identity(
    entitlement: &dyn Entitlement,
    identities: &[Identity],
) -> Result<(), EntitlementError> {
    check_limit(
        "identities",
        PlanLimits::for_entitlement(entitlement).identities,
        identities.len(),
    )
}

/// Fails when one more habit would exceed the plan. Habits are counted
/// across all identities.
pub fn check_add_habit(
    entitlement: &dyn Entitlement,
    identities: &[Identity],
) -> Result<(), EntitlementError> {
    check_limit(
        "habits",
        PlanLimits::for_entitlement(entitlement).habits,
        all_habits(identities).count(),
    )
}

pub fn check_feature(
    entitlement: &dyn Entitlement,
    feature: PremiumFeature,
) -> Result<(), EntitlementError> {
    if entitlement.is_entitled() {
        Ok(())
    } else {
        Err(EntitlementError::PremiumRequired(feature.name().to_string()))
    }
}

/// Grace days are honored only for entitled users who turned them on.
pub fn allow_grace(entitlement: &dyn Entitlement, requested: bool) -> bool {
    requested && entitlement.is_entitled()
}

fn check_limit(
    resource: &str,
    limit: Option<usize>,
    current: usize,
) -> Result<(), EntitlementError> {
    match limit {
        Some(limit) if current >= limit => Err(EntitlementError::LimitReached {
            resource: resource.to_string(),
            limit,
        }),
        _ => Ok(()),
    }
}
