//! Reminder delivery for the CLI.
//!
//! There is no OS notification center behind a terminal, so scheduled
//! requests are kept in the database under [`OUTBOX_KEY`] for other tools
//! (or `habitly reminders list`) to pick up.

use std::sync::Arc;

use habitly_core::reminders::{Notifier, ScheduleRequest};
use habitly_core::{Database, NotifyError};

pub const OUTBOX_KEY: &str = "scheduledReminders";

pub struct OutboxNotifier {
    db: Arc<Database>,
}

impl OutboxNotifier {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn scheduled(&self) -> Result<Vec<ScheduleRequest>, NotifyError> {
        read_outbox(&self.db)
    }
}

pub fn read_outbox(db: &Database) -> Result<Vec<ScheduleRequest>, NotifyError> {
    match db.kv_get(OUTBOX_KEY)? {
        Some(blob) => serde_json::from_str(&blob).map_err(|e| NotifyError::Delivery(e.to_string())),
        None => Ok(Vec::new()),
    }
}

fn write_outbox(db: &Database, requests: &[ScheduleRequest]) -> Result<(), NotifyError> {
    let blob = serde_json::to_string(requests).map_err(|e| NotifyError::Delivery(e.to_string()))?;
    db.kv_set(OUTBOX_KEY, &blob)?;
    Ok(())
}

impl Notifier for OutboxNotifier {
    fn schedule(&self, request: &ScheduleRequest) -> Result<(), NotifyError> {
        let mut requests = self.scheduled()?;
        requests.retain(|r| r.timing != request.timing);
        requests.push(request.clone());
        write_outbox(&self.db, &requests)
    }

    fn cancel_all(&self) -> Result<(), NotifyError> {
        write_outbox(&self.db, &[])
    }
}
