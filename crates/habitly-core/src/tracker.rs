//! Single-writer façade over the collection.
//!
//! The tracker owns the current snapshot. Each mutation runs synchronously
//! through [`crate::mutation`]; when the result differs from the previous
//! snapshot it is handed to the write-behind writer and the reminder
//! debouncer. Reads evaluate "today" from the clock every time.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clock::Clock;
use crate::derive::{daily_progress, enrich, IdentityView};
use crate::error::{Result, ValidationError};
use crate::model::{Habit, HabitPatch, Identity, IdentityPatch, Snapshot};
use crate::mutation;
use crate::reminders::{
    NoopNotifier, Notifier, ReminderDebouncer, ReminderScheduler, TimingHours, DEFAULT_DEBOUNCE,
};
use crate::storage::{load_identities, Config, KeyValueStore, SnapshotWriter};

/// Reminder wiring for a tracker.
#[derive(Clone)]
pub struct TrackerOptions {
    pub notifier: Arc<dyn Notifier>,
    pub reminders_enabled: bool,
    pub hours: TimingHours,
    pub debounce: Duration,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            notifier: Arc::new(NoopNotifier),
            reminders_enabled: true,
            hours: TimingHours::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl TrackerOptions {
    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            reminders_enabled: config.reminders.enabled,
            hours: config.reminders.hours,
            debounce: config.debounce(),
        }
    }
}

pub struct HabitTracker {
    identities: Snapshot,
    clock: Arc<dyn Clock>,
    writer: SnapshotWriter,
    scheduler: ReminderScheduler,
    debouncer: ReminderDebouncer,
}

impl HabitTracker {
    /// Load the stored collection and start the background writer.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Storage failures and a stored blob that is not valid JSON.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        options: TrackerOptions,
    ) -> Result<Self> {
        let identities: Snapshot = Arc::new(load_identities(&*store)?);
        debug!(identities = identities.len(), "tracker opened");

        let writer = SnapshotWriter::spawn(store, Arc::clone(&identities));
        let scheduler =
            ReminderScheduler::new(options.notifier, options.hours, options.reminders_enabled);
        let debouncer = ReminderDebouncer::new(Arc::clone(&clock), options.debounce);

        Ok(Self {
            identities,
            clock,
            writer,
            scheduler,
            debouncer,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The raw collection, shared.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.identities)
    }

    /// The collection with `checked_today` evaluated now.
    pub fn identities(&self) -> Vec<IdentityView<'_>> {
        enrich(&self.identities, self.today())
    }

    pub fn daily_progress(&self) -> (usize, usize) {
        daily_progress(&self.identities, self.today())
    }

    pub fn add_identity(&mut self, identity: Identity) -> bool {
        let next = mutation::add_identity(&self.identities, identity);
        self.commit(next)
    }

    pub fn add_habit(&mut self, habit: Habit) -> bool {
        let next = mutation::add_habit(&self.identities, habit);
        self.commit(next)
    }

    /// Log `duration` minutes for today.
    pub fn log_completion(&mut self, habit: &Habit, duration: u32) -> bool {
        let next = mutation::log_completion(&self.identities, habit, duration, self.today());
        self.commit(next)
    }

    pub fn undo_completion(&mut self, habit: &Habit) -> bool {
        let next = mutation::undo_completion(&self.identities, habit, self.today());
        self.commit(next)
    }

    pub fn edit_habit(&mut self, habit_id: &str, patch: &HabitPatch) -> bool {
        let next = mutation::edit_habit(&self.identities, habit_id, patch);
        self.commit(next)
    }

    pub fn delete_habit(&mut self, habit_id: &str) -> bool {
        let next = mutation::delete_habit(&self.identities, habit_id);
        self.commit(next)
    }

    pub fn edit_identity(&mut self, identity_id: &str, patch: &IdentityPatch) -> bool {
        let next = mutation::edit_identity(&self.identities, identity_id, patch);
        self.commit(next)
    }

    pub fn delete_identity(&mut self, identity_id: &str) -> bool {
        let next = mutation::delete_identity(&self.identities, identity_id);
        self.commit(next)
    }

    /// # Errors
    /// [`ValidationError::ReorderMismatch`] when `ordered_ids` is not a
    /// permutation of the identity's habit ids. The collection is untouched.
    pub fn reorder_habits<S: AsRef<str>>(
        &mut self,
        identity_id: &str,
        ordered_ids: &[S],
    ) -> Result<bool, ValidationError> {
        let next = mutation::reorder_habits(&self.identities, identity_id, ordered_ids)?;
        Ok(self.commit(next))
    }

    pub fn reminders_enabled(&self) -> bool {
        self.scheduler.is_enabled()
    }

    pub fn reminder_hours(&self) -> TimingHours {
        *self.scheduler.hours()
    }

    /// Toggle reminders. Disabling cancels everything right away; enabling
    /// schedules the current plan right away.
    pub fn set_reminders_enabled(&mut self, enabled: bool) {
        if self.scheduler.set_enabled(enabled) {
            self.reschedule_reminders();
        }
    }

    pub fn set_reminder_hours(&mut self, hours: TimingHours) {
        if *self.scheduler.hours() != hours {
            self.scheduler.set_hours(hours);
            self.reschedule_reminders();
        }
    }

    /// Run a reminder pass now, dropping any pending debounced one.
    pub fn reschedule_reminders(&mut self) -> usize {
        self.debouncer.cancel();
        self.scheduler.reschedule(&self.identities, self.today())
    }

    /// Run the pending debounced pass now, if there is one.
    pub fn flush_reminders(&mut self) -> Option<usize> {
        self.debouncer.flush()
    }

    /// Drop pending reminder work and wait until the last snapshot is stored.
    pub async fn close(self) {
        let Self {
            writer,
            mut debouncer,
            ..
        } = self;
        if debouncer.cancel() {
            debug!("pending reminder pass dropped on close");
        }
        writer.close().await;
    }

    fn commit(&mut self, next: Vec<Identity>) -> bool {
        if next == *self.identities {
            return false;
        }
        let next: Snapshot = Arc::new(next);
        self.identities = Arc::clone(&next);
        self.writer.submit(Arc::clone(&next));
        self.debouncer.poke(&self.scheduler, next);
        debug!(identities = self.identities.len(), "collection updated");
        true
    }
}
