//! Per-group draw state.

use serde::{Deserialize, Serialize};

/// Persisted draw counters for one group.
///
/// Serialized with camelCase keys for compatibility with record files written
/// by earlier deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDrawRecord {
    /// Draws since the last hourly reset.
    pub count: u32,
    /// When `count` was last zeroed (epoch milliseconds).
    pub last_reset_time: i64,
    /// Consecutive draws since the last jackpot. Never reset by the hourly
    /// window -- pity is a long-run counter.
    pub pity: u32,
    /// True if the next jackpot is guaranteed to consume the carried 50/50.
    pub guaranteed: bool,
}

impl GroupDrawRecord {
    /// Fresh record for a group drawing for the first time.
    pub fn new(now_ms: i64) -> Self {
        Self {
            count: 0,
            last_reset_time: now_ms,
            pity: 0,
            guaranteed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let record = GroupDrawRecord {
            count: 3,
            last_reset_time: 1_700_000_000_000,
            pity: 12,
            guaranteed: true,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"lastResetTime\":1700000000000"));
        assert!(json.contains("\"pity\":12"));

        let back: GroupDrawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_reads_legacy_record_shape() {
        let json = r#"{"count":5,"lastResetTime":1234,"pity":7,"guaranteed":false}"#;
        let record: GroupDrawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.count, 5);
        assert_eq!(record.last_reset_time, 1234);
        assert_eq!(record.pity, 7);
        assert!(!record.guaranteed);
    }
}
