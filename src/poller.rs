// src/poller.rs
//! One background polling loop per source.
//!
//! Each poller owns a single adapter, drives it on a fixed cadence, and is
//! the sole writer of that source's entry in the snapshot store. A poll
//! attempt is bounded by a timeout shorter than the interval, so at most one
//! attempt is ever in flight per source and a hung upstream costs exactly
//! one cycle. Failures are contained here: they update health metadata and
//! are retried on the next tick, nothing propagates to query handlers or to
//! other pollers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, gauge, histogram};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::AdapterError;
use crate::sources::SourceAdapter;
use crate::store::SnapshotStore;

/// Fraction of the tick interval a single attempt may use.
const TIMEOUT_FRACTION: f64 = 0.8;

#[derive(Clone, Copy, Debug)]
pub struct PollerConfig {
    /// Tick cadence for this source.
    pub interval: Duration,
    /// Per-attempt bound; always shorter than `interval`.
    pub timeout: Duration,
    /// Failure streak beyond which stale data is no longer trusted.
    pub failure_threshold: u32,
}

impl PollerConfig {
    /// Config with the timeout clamped below the interval so an attempt can
    /// never outlive its own cadence.
    pub fn for_interval(interval: Duration, failure_threshold: u32) -> Self {
        Self {
            interval,
            timeout: interval.mul_f64(TIMEOUT_FRACTION),
            failure_threshold,
        }
    }
}

/// Spawn the polling loop for one adapter. Runs for the life of the process.
pub fn spawn_poller(
    store: Arc<SnapshotStore>,
    adapter: Arc<dyn SourceAdapter>,
    cfg: PollerConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.interval);
        // A slow attempt must not cause a burst of catch-up ticks.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            poll_once(&store, adapter.as_ref(), &cfg).await;
        }
    })
}

/// One poll attempt: fetch under the bound, publish success or failure.
/// Public so tests can drive ticks without real timers.
pub async fn poll_once(store: &SnapshotStore, adapter: &dyn SourceAdapter, cfg: &PollerConfig) {
    let source = adapter.source();
    let started = std::time::Instant::now();

    let outcome = tokio::time::timeout(cfg.timeout, adapter.fetch(cfg.timeout)).await;

    let ms = started.elapsed().as_secs_f64() * 1_000.0;
    histogram!("cloudview_poll_duration_ms", "source" => source.as_str()).record(ms);

    match outcome {
        Ok(Ok(record)) => {
            store.publish_success(record, Utc::now());
            counter!("cloudview_poll_success_total", "source" => source.as_str()).increment(1);
            gauge!("cloudview_source_consecutive_failures", "source" => source.as_str()).set(0.0);
            tracing::debug!(target: "poller", source = %source, elapsed_ms = ms, "poll ok");
        }
        Ok(Err(e)) => publish_failure(store, source, e, cfg),
        // The attempt overran its bound; abandon it for this cycle.
        Err(_elapsed) => publish_failure(store, source, AdapterError::Timeout, cfg),
    }
}

fn publish_failure(
    store: &SnapshotStore,
    source: crate::source::SourceId,
    error: AdapterError,
    cfg: &PollerConfig,
) {
    let msg = error.to_string();
    store.publish_failure(source, msg.clone(), cfg.failure_threshold);

    let state = store.get(source);
    counter!("cloudview_poll_failure_total", "source" => source.as_str()).increment(1);
    gauge!("cloudview_source_consecutive_failures", "source" => source.as_str())
        .set(state.consecutive_failures as f64);

    tracing::warn!(
        target: "poller",
        source = %source,
        error = %msg,
        consecutive_failures = state.consecutive_failures,
        status = ?state.status,
        "poll failed"
    );
}
