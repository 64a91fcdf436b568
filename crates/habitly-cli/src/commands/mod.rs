pub mod account;
pub mod catalog;
pub mod config;
pub mod export;
pub mod habit;
pub mod identity;
pub mod reminders;
pub mod stats;

use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
