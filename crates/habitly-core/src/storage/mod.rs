//! Persistence gateway.
//!
//! The engine only needs a string key-value store. The whole collection is
//! saved as one JSON blob under [`snapshot::STORAGE_KEY`].

mod config;
pub mod database;
pub mod memory;
pub mod snapshot;
pub mod writer;

pub use config::{AccountConfig, Config, RemindersConfig, StreaksConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use snapshot::{load_identities, repair, save_identities, STORAGE_KEY};
pub use writer::SnapshotWriter;

use std::path::PathBuf;

use crate::error::StorageError;

/// String key-value storage.
///
/// Implementations must be shareable across threads: the snapshot writer calls
/// `set` from the blocking pool.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `HABITLY_DATA_DIR` wins when set. Otherwise `~/.config/habitly`, or
/// `~/.config/habitly-dev` when `HABITLY_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("HABITLY_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITLY_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("habitly-dev")
            } else {
                base_dir.join("habitly")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
