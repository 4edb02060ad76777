//! # Snapshot store
//! Concurrency-safe keyed cache holding the most recent known state per
//! source. One entry per [`SourceId`], created `Unknown` at startup.
//!
//! Locking discipline: each entry has its own `RwLock` and exactly one
//! writer (the owning poller), so there is no write contention and no global
//! lock. Readers clone the entry out under a short read lock; a reader can
//! observe the old or the new state of an entry, never a torn one.
//! `snapshot_all` reads entries one at a time — slight skew across sources
//! is fine, there is no cross-source consistency requirement.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::source::{Record, SourceId, SourceState};

#[derive(Debug)]
pub struct SnapshotStore {
    entries: HashMap<SourceId, RwLock<SourceState>>,
}

impl SnapshotStore {
    /// Build the store with one `Unknown` entry for every configured source.
    pub fn new() -> Self {
        let entries = SourceId::ALL
            .iter()
            .map(|&id| (id, RwLock::new(SourceState::unknown(id))))
            .collect();
        Self { entries }
    }

    fn entry(&self, source: SourceId) -> &RwLock<SourceState> {
        // Every SourceId has an entry from construction on.
        self.entries
            .get(&source)
            .expect("snapshot store initialized with all sources")
    }

    /// Current state of one source. Pure memory read, never blocks on I/O.
    pub fn get(&self, source: SourceId) -> SourceState {
        self.entry(source)
            .read()
            .expect("snapshot entry rwlock poisoned")
            .clone()
    }

    /// Publish a successful poll result. Caller must be the owning poller.
    pub fn publish_success(&self, record: Record, now: DateTime<Utc>) {
        let source = record.source();
        let mut state = self
            .entry(source)
            .write()
            .expect("snapshot entry rwlock poisoned");
        state.apply_success(record, now);
    }

    /// Publish a failed poll attempt. Caller must be the owning poller.
    pub fn publish_failure(&self, source: SourceId, error: String, failure_threshold: u32) {
        let mut state = self
            .entry(source)
            .write()
            .expect("snapshot entry rwlock poisoned");
        state.apply_failure(error, failure_threshold);
    }

    /// Consistent per-entry read of every source, in stable order.
    pub fn snapshot_all(&self) -> Vec<SourceState> {
        SourceId::ALL.iter().map(|&id| self.get(id)).collect()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
