//! Reminder planning and delivery.
//!
//! Habits not yet done today are grouped by [`Timing`]; each non-empty group
//! becomes one daily [`ScheduleRequest`] handed to a [`Notifier`]. Every pass
//! starts by cancelling what was scheduled before, so a pass always reflects
//! the latest collection.

mod debounce;

pub use debounce::{ReminderDebouncer, DEFAULT_DEBOUNCE};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::derive::checked_on;
use crate::error::NotifyError;
use crate::model::{all_habits, Identity, Timing};

/// Hour of day (0-23) at which each timing bucket fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingHours {
    #[serde(default = "default_morning")]
    pub morning: u8,
    #[serde(default = "default_afternoon")]
    pub afternoon: u8,
    #[serde(default = "default_evening")]
    pub evening: u8,
    #[serde(default = "default_night")]
    pub night: u8,
    #[serde(default = "default_anytime")]
    pub anytime: u8,
}

fn default_morning() -> u8 {
    8
}
fn default_afternoon() -> u8 {
    13
}
fn default_evening() -> u8 {
    18
}
fn default_night() -> u8 {
    21
}
fn default_anytime() -> u8 {
    10
}

impl Default for TimingHours {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            afternoon: default_afternoon(),
            evening: default_evening(),
            night: default_night(),
            anytime: default_anytime(),
        }
    }
}

impl TimingHours {
    pub fn hour_for(&self, timing: Timing) -> u8 {
        match timing {
            Timing::Morning => self.morning,
            Timing::Afternoon => self.afternoon,
            Timing::Evening => self.evening,
            Timing::Night => self.night,
            Timing::Anytime => self.anytime,
        }
    }

    pub fn set_hour(&mut self, timing: Timing, hour: u8) {
        let slot = match timing {
            Timing::Morning => &mut self.morning,
            Timing::Afternoon => &mut self.afternoon,
            Timing::Evening => &mut self.evening,
            Timing::Night => &mut self.night,
            Timing::Anytime => &mut self.anytime,
        };
        *slot = hour;
    }

    /// First bucket whose hour is outside 0-23.
    pub fn invalid_bucket(&self) -> Option<Timing> {
        Timing::ALL.into_iter().find(|t| self.hour_for(*t) > 23)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    Daily,
}

/// One repeating notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub timing: Timing,
    pub title: String,
    pub body: String,
    pub trigger_hour: u8,
    pub trigger_minute: u8,
    pub recurrence: Recurrence,
}

/// Requests for every timing bucket holding at least one habit not done on
/// `today`, in [`Timing`] order.
pub fn plan_reminders(
    identities: &[Identity],
    today: NaiveDate,
    hours: &TimingHours,
) -> Vec<ScheduleRequest> {
    let mut buckets: BTreeMap<Timing, Vec<&str>> = BTreeMap::new();
    for habit in all_habits(identities).filter(|h| !checked_on(h, today)) {
        buckets.entry(habit.timing).or_default().push(habit.label.as_str());
    }

    buckets
        .into_iter()
        .map(|(timing, labels)| {
            let body = match labels.as_slice() {
                [only] => format!("Time for: {only}"),
                _ => format!("You have {} habits to complete", labels.len()),
            };
            ScheduleRequest {
                timing,
                title: format!("{timing} Habits"),
                body,
                trigger_hour: hours.hour_for(timing),
                trigger_minute: 0,
                recurrence: Recurrence::Daily,
            }
        })
        .collect()
}

/// Delivery collaborator for reminders.
pub trait Notifier: Send + Sync {
    fn schedule(&self, request: &ScheduleRequest) -> Result<(), NotifyError>;

    /// Drop every request scheduled so far.
    fn cancel_all(&self) -> Result<(), NotifyError>;
}

/// Notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn schedule(&self, _request: &ScheduleRequest) -> Result<(), NotifyError> {
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// What a [`RecordingNotifier`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    CancelAll,
    Schedule(ScheduleRequest),
}

/// Notifier that keeps every call in memory. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<NotifierCall>>>,
    fail_schedule: Arc<Mutex<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of passes, counted by their leading `cancel_all`.
    pub fn passes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, NotifierCall::CancelAll))
            .count()
    }

    /// Requests scheduled since the last `cancel_all`.
    pub fn active(&self) -> Vec<ScheduleRequest> {
        let calls = self.calls();
        let start = calls
            .iter()
            .rposition(|c| matches!(c, NotifierCall::CancelAll))
            .map_or(0, |i| i + 1);
        calls[start..]
            .iter()
            .filter_map(|c| match c {
                NotifierCall::Schedule(r) => Some(r.clone()),
                NotifierCall::CancelAll => None,
            })
            .collect()
    }

    /// Make every `schedule` call fail (calls are still recorded).
    pub fn set_fail_schedule(&self, fail: bool) {
        if let Ok(mut f) = self.fail_schedule.lock() {
            *f = fail;
        }
    }

    fn record(&self, call: NotifierCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn schedule(&self, request: &ScheduleRequest) -> Result<(), NotifyError> {
        self.record(NotifierCall::Schedule(request.clone()));
        if self.fail_schedule.lock().map(|f| *f).unwrap_or(false) {
            return Err(NotifyError::Delivery("rejected".to_string()));
        }
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), NotifyError> {
        self.record(NotifierCall::CancelAll);
        Ok(())
    }
}

/// Enabled flag, bucket hours and the delivery collaborator.
#[derive(Clone)]
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    hours: TimingHours,
    enabled: bool,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, hours: TimingHours, enabled: bool) -> Self {
        Self {
            notifier,
            hours,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn hours(&self) -> &TimingHours {
        &self.hours
    }

    pub fn set_hours(&mut self, hours: TimingHours) {
        self.hours = hours;
    }

    /// Flip the flag. Returns true when the state actually changed; the caller
    /// then runs a pass so that disabling cancels and enabling re-arms.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Cancel everything, then schedule the current plan if enabled.
    ///
    /// Delivery failures are logged and skipped. Returns the number of
    /// requests the notifier accepted.
    pub fn reschedule(&self, identities: &[Identity], today: NaiveDate) -> usize {
        if let Err(e) = self.notifier.cancel_all() {
            warn!(error = %e, "failed to cancel scheduled reminders");
        }
        if !self.enabled {
            debug!("reminders disabled, nothing scheduled");
            return 0;
        }

        let mut scheduled = 0;
        for request in plan_reminders(identities, today, &self.hours) {
            match self.notifier.schedule(&request) {
                Ok(()) => scheduled += 1,
                Err(e) => {
                    warn!(timing = %request.timing, error = %e, "failed to schedule reminder")
                }
            }
        }
        debug!(scheduled, "reminder pass complete");
        scheduled
    }
}

impl std::fmt::Debug for ReminderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderScheduler")
            .field("hours", &self.hours)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
