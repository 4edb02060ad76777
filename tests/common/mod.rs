// tests/common/mod.rs
// Shared fixtures: scripted adapters and record builders.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use cloudview::sources::SourceAdapter;
use cloudview::source::{DatabaseSummary, InstanceSummary};
use cloudview::{AdapterError, Record, SourceId};

/// Adapter that replays a scripted sequence of outcomes; once the script is
/// exhausted it keeps repeating the final configured fallback.
pub struct ScriptedAdapter {
    source: SourceId,
    script: Mutex<VecDeque<Result<Record, AdapterError>>>,
    fallback_error: String,
    pub calls: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn new(
        source: SourceId,
        outcomes: impl IntoIterator<Item = Result<Record, AdapterError>>,
    ) -> Self {
        Self {
            source,
            script: Mutex::new(outcomes.into_iter().collect()),
            fallback_error: "script exhausted".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Succeeds forever with clones of one record.
    pub fn always(source: SourceId, record: Record) -> AlwaysAdapter {
        AlwaysAdapter {
            source,
            record,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch(&self, _timeout: Duration) -> Result<Record, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AdapterError::Http(self.fallback_error.clone())))
    }
}

pub struct AlwaysAdapter {
    source: SourceId,
    record: Record,
    pub calls: AtomicUsize,
}

#[async_trait]
impl SourceAdapter for AlwaysAdapter {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch(&self, _timeout: Duration) -> Result<Record, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.record.clone())
    }
}

/// Adapter whose fetch never resolves; stands in for a hung upstream.
pub struct HangingAdapter {
    pub source: SourceId,
}

#[async_trait]
impl SourceAdapter for HangingAdapter {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch(&self, _timeout: Duration) -> Result<Record, AdapterError> {
        tokio::time::sleep(Duration::from_secs(86_400)).await;
        unreachable!("hanging adapter resolved")
    }
}

pub fn instances_record(entries: &[(&str, f64)]) -> Record {
    Record::Instances(
        entries
            .iter()
            .map(|(id, cpu)| InstanceSummary {
                id: id.to_string(),
                state: "running".into(),
                instance_type: "t3.micro".into(),
                launch_time: None,
                cpu_utilization: Some(*cpu),
            })
            .collect(),
    )
}

pub fn db_record(ids: &[&str]) -> Record {
    Record::Databases(
        ids.iter()
            .map(|id| DatabaseSummary {
                id: id.to_string(),
                status: "available".into(),
                engine: "postgres".into(),
            })
            .collect(),
    )
}
