//! Storage: draw records, mute log and configuration.

mod config;
mod mutes;
mod records;

pub use config::Config;
pub use mutes::{MuteLog, MuteRecord};
pub use records::{JsonRecordStore, MemoryRecordStore, RecordStore};

use std::path::PathBuf;

use crate::error::StoreError;

/// Returns `~/.config/muteroll[-dev]/` based on MUTEROLL_ENV.
///
/// Set MUTEROLL_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MUTEROLL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("muteroll-dev")
    } else {
        base_dir.join("muteroll")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
