//! Serialized draws against a record store.

use std::sync::Mutex;

use rand::Rng;
use tracing::debug;

use super::config::GachaConfig;
use super::engine;
use super::engine::Outcome;
use super::record::GroupDrawRecord;
use crate::error::{CoreError, StoreError};
use crate::storage::RecordStore;

/// Runs draws as a single read-modify-write against the store.
///
/// The store's record is read, mutated and written back under one lock, so at
/// most one mutation per group record is ever in flight. A single coarse
/// mutex is enough for the single-process store backing this engine.
pub struct DrawService<S: RecordStore> {
    store: S,
    gate: Mutex<()>,
}

impl<S: RecordStore> DrawService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            gate: Mutex::new(()),
        }
    }

    /// Draw for a group, creating its record lazily on first use.
    ///
    /// Returns the outcome together with the record as persisted.
    pub fn draw<R: Rng>(
        &self,
        group_id: &str,
        config: &GachaConfig,
        now_ms: i64,
        rng: &mut R,
    ) -> Result<(Outcome, GroupDrawRecord), CoreError> {
        let _serialized = self.gate.lock().unwrap();
        let mut record = self
            .store
            .get(group_id)?
            .unwrap_or_else(|| GroupDrawRecord::new(now_ms));
        let outcome = engine::draw(&mut record, config, now_ms, rng)?;
        self.store.put(group_id, &record)?;
        debug!(
            group = group_id,
            milliseconds = outcome.milliseconds,
            jackpot = outcome.is_jackpot,
            "draw persisted"
        );
        Ok((outcome, record))
    }

    /// Current record for a group, if it has ever drawn.
    pub fn record(&self, group_id: &str) -> Result<Option<GroupDrawRecord>, StoreError> {
        let _serialized = self.gate.lock().unwrap();
        self.store.get(group_id)
    }

    /// Administrative reset: replace a group's record with a fresh one.
    pub fn reset(&self, group_id: &str, now_ms: i64) -> Result<(), StoreError> {
        let _serialized = self.gate.lock().unwrap();
        self.store.put(group_id, &GroupDrawRecord::new(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRecordStore;
    use rand::prelude::*;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn test_record_is_created_lazily() {
        let service = DrawService::new(MemoryRecordStore::new());
        assert!(service.record("g1").unwrap().is_none());

        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        let config = GachaConfig::default();
        service.draw("g1", &config, 1_000, &mut rng).unwrap();

        let record = service.record("g1").unwrap().unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.last_reset_time, 1_000);
    }

    #[test]
    fn test_counts_accumulate_within_window() {
        let service = DrawService::new(MemoryRecordStore::new());
        let config = GachaConfig::default();
        let mut rng = Mcg128Xsl64::seed_from_u64(9);
        for i in 0..10 {
            service.draw("g1", &config, i * 1_000, &mut rng).unwrap();
        }
        assert_eq!(service.record("g1").unwrap().unwrap().count, 10);
    }

    #[test]
    fn test_groups_are_independent() {
        let service = DrawService::new(MemoryRecordStore::new());
        let config = GachaConfig::default();
        let mut rng = Mcg128Xsl64::seed_from_u64(5);
        service.draw("a", &config, 0, &mut rng).unwrap();
        service.draw("a", &config, 0, &mut rng).unwrap();
        service.draw("b", &config, 0, &mut rng).unwrap();
        assert_eq!(service.record("a").unwrap().unwrap().count, 2);
        assert_eq!(service.record("b").unwrap().unwrap().count, 1);
    }

    #[test]
    fn test_reset_replaces_record() {
        let service = DrawService::new(MemoryRecordStore::new());
        let config = GachaConfig::default();
        let mut rng = Mcg128Xsl64::seed_from_u64(5);
        for _ in 0..5 {
            service.draw("g1", &config, 0, &mut rng).unwrap();
        }
        service.reset("g1", 99).unwrap();
        let record = service.record("g1").unwrap().unwrap();
        assert_eq!(record, GroupDrawRecord::new(99));
    }
}
