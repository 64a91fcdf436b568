//! Trailing-edge debounce for reminder passes.
//!
//! Mutations arrive in bursts (log, edit, reorder). Each poke aborts the
//! pending timer and starts a new one, so only the last snapshot of a burst
//! is scheduled. At most one timer task exists at any time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::ReminderScheduler;
use crate::clock::Clock;
use crate::model::Snapshot;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A pass waiting for its timer. Whoever claims it first (timer or flush) runs it.
struct PendingPass {
    scheduler: ReminderScheduler,
    snapshot: Snapshot,
    claimed: AtomicBool,
}

impl PendingPass {
    fn run(&self, clock: &dyn Clock) -> Option<usize> {
        if self.claimed.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.scheduler.reschedule(&self.snapshot, clock.today()))
    }
}

struct Pending {
    handle: JoinHandle<()>,
    pass: Arc<PendingPass>,
}

pub struct ReminderDebouncer {
    delay: Duration,
    clock: Arc<dyn Clock>,
    pending: Option<Pending>,
}

impl ReminderDebouncer {
    pub fn new(clock: Arc<dyn Clock>, delay: Duration) -> Self {
        Self {
            delay,
            clock,
            pending: None,
        }
    }

    /// Restart the timer for a pass over `snapshot`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn poke(&mut self, scheduler: &ReminderScheduler, snapshot: Snapshot) {
        self.cancel();

        let pass = Arc::new(PendingPass {
            scheduler: scheduler.clone(),
            snapshot,
            claimed: AtomicBool::new(false),
        });
        let task_pass = Arc::clone(&pass);
        let clock = Arc::clone(&self.clock);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(scheduled) = task_pass.run(clock.as_ref()) {
                debug!(scheduled, "debounced reminder pass ran");
            }
        });
        self.pending = Some(Pending { handle, pass });
    }

    /// True while a pass is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.pass.claimed.load(Ordering::SeqCst))
    }

    /// Drop the pending pass without running it. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                // Claim it so an already-woken timer cannot run it either.
                !pending.pass.claimed.swap(true, Ordering::SeqCst)
            }
            None => false,
        }
    }

    /// Run the pending pass now instead of waiting for the timer.
    ///
    /// Returns the number of scheduled requests, or `None` when nothing was pending.
    pub fn flush(&mut self) -> Option<usize> {
        let pending = self.pending.take()?;
        pending.handle.abort();
        pending.pass.run(self.clock.as_ref())
    }
}

impl Drop for ReminderDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::{Habit, Identity};
    use crate::reminders::{RecordingNotifier, TimingHours};
    use chrono::NaiveDate;

    fn setup() -> (RecordingNotifier, ReminderScheduler, ReminderDebouncer) {
        let notifier = RecordingNotifier::new();
        let scheduler =
            ReminderScheduler::new(Arc::new(notifier.clone()), TimingHours::default(), true);
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        ));
        let debouncer = ReminderDebouncer::new(clock, DEFAULT_DEBOUNCE);
        (notifier, scheduler, debouncer)
    }

    fn snapshot(habits: usize) -> Snapshot {
        let mut identity = Identity::new("i", "I", "x");
        identity.habits = (0..habits)
            .map(|n| Habit::new(format!("h{n}"), "i", format!("Habit {n}")))
            .collect();
        Arc::new(vec![identity])
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_one_pass_with_latest_snapshot() {
        let (notifier, scheduler, mut debouncer) = setup();
        for n in 1..=5 {
            debouncer.poke(&scheduler, snapshot(n));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(notifier.passes(), 0);

        tokio::time::sleep(DEFAULT_DEBOUNCE).await;
        assert_eq!(notifier.passes(), 1);
        assert_eq!(notifier.active()[0].body, "You have 5 habits to complete");
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_pass() {
        let (notifier, scheduler, mut debouncer) = setup();
        debouncer.poke(&scheduler, snapshot(1));
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());

        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        assert_eq!(notifier.passes(), 0);
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_runs_immediately_and_only_once() {
        let (notifier, scheduler, mut debouncer) = setup();
        debouncer.poke(&scheduler, snapshot(1));
        assert_eq!(debouncer.flush(), Some(1));
        assert_eq!(notifier.passes(), 1);

        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        assert_eq!(notifier.passes(), 1);
        assert_eq!(debouncer.flush(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_pass() {
        let (notifier, scheduler, mut debouncer) = setup();
        debouncer.poke(&scheduler, snapshot(2));
        drop(debouncer);
        tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
        assert_eq!(notifier.passes(), 0);
    }
}
