//! Draw record persistence.
//!
//! Records are stored as one JSON object keyed by group id:
//!
//! ```json
//! { "12345": { "count": 3, "lastResetTime": 1700000000000, "pity": 7, "guaranteed": false } }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::gacha::GroupDrawRecord;

use super::data_dir;

/// Durable per-group draw records.
///
/// Implementations own whatever locking their backing medium needs; callers
/// that read-modify-write must serialize through [`crate::DrawService`].
pub trait RecordStore: Send + Sync {
    fn get(&self, group_id: &str) -> Result<Option<GroupDrawRecord>, StoreError>;
    fn put(&self, group_id: &str, record: &GroupDrawRecord) -> Result<(), StoreError>;
}

/// File-backed store: the whole record map is read and rewritten per call,
/// mirroring how the record files have always been managed.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    /// Open the store at the default location.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            path: data_dir()?.join("draw_records.json"),
        })
    }

    /// Open the store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, GroupDrawRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        // A malformed file is treated as empty rather than fatal.
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    fn save(&self, records: &HashMap<String, GroupDrawRecord>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn get(&self, group_id: &str) -> Result<Option<GroupDrawRecord>, StoreError> {
        Ok(self.load()?.get(group_id).cloned())
    }

    fn put(&self, group_id: &str, record: &GroupDrawRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.insert(group_id.to_string(), record.clone());
        self.save(&records)
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, GroupDrawRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, group_id: &str) -> Result<Option<GroupDrawRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(group_id).cloned())
    }

    fn put(&self, group_id: &str, record: &GroupDrawRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(group_id.to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonRecordStore::with_path(dir.path().join("records.json"));
        assert!(store.get("g1").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = JsonRecordStore::with_path(dir.path().join("records.json"));

        let record = GroupDrawRecord {
            count: 2,
            last_reset_time: 1234,
            pity: 5,
            guaranteed: true,
        };
        store.put("g1", &record).unwrap();
        assert_eq!(store.get("g1").unwrap().unwrap(), record);
        assert!(store.get("g2").unwrap().is_none());
    }

    #[test]
    fn test_put_preserves_other_groups() {
        let dir = TempDir::new().unwrap();
        let store = JsonRecordStore::with_path(dir.path().join("records.json"));

        store.put("a", &GroupDrawRecord::new(1)).unwrap();
        store.put("b", &GroupDrawRecord::new(2)).unwrap();
        assert_eq!(store.get("a").unwrap().unwrap().last_reset_time, 1);
        assert_eq!(store.get("b").unwrap().unwrap().last_reset_time, 2);
    }

    #[test]
    fn test_file_uses_legacy_wire_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"{"777": {"count": 1, "lastResetTime": 99, "pity": 4, "guaranteed": false}}"#,
        )
        .unwrap();

        let store = JsonRecordStore::with_path(path);
        let record = store.get("777").unwrap().unwrap();
        assert_eq!(record.pity, 4);
        assert_eq!(record.last_reset_time, 99);
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonRecordStore::with_path(path);
        assert!(store.get("g1").unwrap().is_none());
        store.put("g1", &GroupDrawRecord::new(5)).unwrap();
        assert!(store.get("g1").unwrap().is_some());
    }

    #[test]
    fn test_memory_store_round_trips() {
        let store = MemoryRecordStore::new();
        assert!(store.get("g1").unwrap().is_none());
        store.put("g1", &GroupDrawRecord::new(7)).unwrap();
        assert_eq!(store.get("g1").unwrap().unwrap().last_reset_time, 7);
    }
}
