//! Mute log.
//!
//! Remembers the most recent mute applied per group/user so operators can
//! answer "why is this user quiet and for how much longer". Stored as JSON
//! keyed by group id, then user id.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::data_dir;

/// The most recent mute applied to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuteRecord {
    /// When the mute was applied (epoch milliseconds).
    pub started_at: i64,
    /// Mute length in milliseconds.
    pub duration_ms: i64,
}

impl MuteRecord {
    /// Milliseconds of mute left at `now_ms`, zero once expired.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.started_at + self.duration_ms - now_ms).max(0)
    }
}

type MuteMap = HashMap<String, HashMap<String, MuteRecord>>;

/// File-backed mute log.
pub struct MuteLog {
    path: PathBuf,
}

impl MuteLog {
    /// Open the log at the default location.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            path: data_dir()?.join("mutes.json"),
        })
    }

    /// Open the log at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Record a mute, replacing any previous entry for the user.
    pub fn record(
        &self,
        group_id: &str,
        user_id: &str,
        now_ms: i64,
        duration_ms: i64,
    ) -> Result<(), StoreError> {
        let mut mutes = self.load()?;
        mutes.entry(group_id.to_string()).or_default().insert(
            user_id.to_string(),
            MuteRecord {
                started_at: now_ms,
                duration_ms,
            },
        );
        self.save(&mutes)
    }

    /// Most recent mute for a user, if any.
    pub fn get(&self, group_id: &str, user_id: &str) -> Result<Option<MuteRecord>, StoreError> {
        Ok(self
            .load()?
            .get(group_id)
            .and_then(|users| users.get(user_id))
            .cloned())
    }

    fn load(&self) -> Result<MuteMap, StoreError> {
        if !self.path.exists() {
            return Ok(MuteMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    fn save(&self, mutes: &MuteMap) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(mutes)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
