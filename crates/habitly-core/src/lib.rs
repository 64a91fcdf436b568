//! # Habitly Core Library
//!
//! This library provides the core logic for the Habitly habit tracker.
//! It follows a CLI-first philosophy: every operation is available through the
//! standalone `habitly` binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Model**: Identities owning ordered habits, each with a dated completion log
//! - **Mutations**: Pure functions producing a new collection per change
//! - **Derivation**: `checked_today` computed at read time from a [`Clock`]
//! - **Analytics**: Streaks with grace days, completion rates, weekly and monthly views
//! - **Reminders**: Timing-bucket notifications with debounced rescheduling
//! - **Storage**: Key-value persistence (SQLite or memory) with a write-behind writer,
//!   plus TOML configuration
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: Single-writer façade tying the pieces together
//! - [`Database`]: SQLite key-value store
//! - [`Config`]: Application configuration management
//! - [`Notifier`]: Trait for reminder delivery

pub mod catalog;
pub mod clock;
pub mod derive;
pub mod entitlement;
pub mod error;
pub mod export;
pub mod model;
pub mod mutation;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use derive::{HabitView, IdentityView};
pub use entitlement::{Entitlement, PlanLimits, PremiumFeature, StaticEntitlement};
pub use error::{
    ConfigError, CoreError, EntitlementError, NotifyError, StorageError, ValidationError,
};
pub use export::{build_export, ExportDocument};
pub use model::{CompletionLog, Habit, HabitPatch, Identity, IdentityPatch, Snapshot, Timing};
pub use reminders::{Notifier, ReminderScheduler, ScheduleRequest, TimingHours};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use tracker::{HabitTracker, TrackerOptions};
