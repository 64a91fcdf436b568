//! Everything a command needs: configuration, the database, a tracker wired
//! to the outbox notifier, and the plan.

use std::sync::Arc;

use chrono::NaiveDate;
use habitly_core::entitlement::allow_grace;
use habitly_core::{
    Clock, Config, Database, FixedClock, HabitTracker, StaticEntitlement, SystemClock,
    TrackerOptions,
};

use tracing::debug;

use crate::outbox::OutboxNotifier;

/// Overrides "today" (`YYYY-MM-DD`) for scripted runs.
pub const TODAY_ENV: &str = "HABITLY_TODAY";

pub struct Session {
    pub config: Config,
    pub db: Arc<Database>,
    pub tracker: HabitTracker,
    pub entitlement: StaticEntitlement,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Arc::new(Database::open()?);
        let notifier = Arc::new(OutboxNotifier::new(Arc::clone(&db)));
        let tracker = HabitTracker::open(
            db.clone(),
            clock()?,
            TrackerOptions::from_config(&config, notifier),
        )?;
        let entitlement = StaticEntitlement::new(config.account.pro);

        Ok(Self {
            config,
            db,
            tracker,
            entitlement,
        })
    }

    /// Grace days as configured, honored only on the premium plan.
    pub fn allow_grace(&self) -> bool {
        allow_grace(&self.entitlement, self.config.streaks.grace_days)
    }

    /// Run pending reminder work and wait for the last write.
    pub async fn finish(mut self) {
        self.tracker.flush_reminders();
        self.tracker.close().await;
    }
}

fn clock() -> Result<Arc<dyn Clock>, Box<dyn std::error::Error>> {
    match std::env::var(TODAY_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|e| format!("invalid {TODAY_ENV} '{value}': {e}"))?;
            debug!(%date, "today pinned by {TODAY_ENV}");
            Ok(Arc::new(FixedClock::new(date)))
        }
        _ => Ok(Arc::new(SystemClock)),
    }
}
