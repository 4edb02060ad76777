//! # Aggregator
//! Assembles merged dashboard responses from the snapshot store.
//!
//! Everything here is a pure function over already-cached state: no network
//! I/O, no locking beyond the per-entry reads the store already did, and no
//! precomputed aggregates — derived values are recomputed on every read so
//! they can never drift from the records they summarize.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::source::{Record, SourceId, SourceState, SourceStatus};

/// Source health as exposed at the query boundary.
///
/// `Unknown`, and `Failing` without a carried-forward record, both collapse
/// to `Unavailable`: either way there is nothing to show, and the caller
/// must be able to tell "data unavailable" apart from "zero results".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    Fresh,
    Stale,
    Failing,
    Unavailable,
}

/// One source's state as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceView {
    pub source: SourceId,
    pub status: ViewStatus,
    pub data: Option<Record>,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub consecutive_failures: u32,
}

impl From<SourceState> for SourceView {
    fn from(state: SourceState) -> Self {
        let status = match (state.status, state.record.is_some()) {
            (SourceStatus::Fresh, _) => ViewStatus::Fresh,
            (SourceStatus::Stale, _) => ViewStatus::Stale,
            (SourceStatus::Failing, true) => ViewStatus::Failing,
            (SourceStatus::Failing, false) => ViewStatus::Unavailable,
            (SourceStatus::Unknown, _) => ViewStatus::Unavailable,
        };
        Self {
            source: state.source,
            status,
            data: state.record,
            last_updated: state.last_success_at,
            error: state.last_error,
            consecutive_failures: state.consecutive_failures,
        }
    }
}

/// Cross-source derived values for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub instance_count: usize,
    pub running_instances: usize,
    /// Mean CPU across instances that report one; `None` when no instance
    /// data (or no CPU telemetry) is cached.
    pub average_cpu: Option<f64>,
    /// Instances at or above the CPU alert threshold.
    pub cpu_alerts: usize,
    pub database_count: usize,
    pub databases_available: usize,
}

/// The "everything" response: every source's current view plus derived
/// aggregates and the overall degraded flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedResponse {
    pub sources: BTreeMap<SourceId, SourceView>,
    pub degraded: bool,
    pub summary: DashboardSummary,
}

/// Compute the dashboard summary from whatever records are currently cached.
/// Sources without a record contribute nothing.
pub fn summarize(states: &[SourceState], cpu_alert_threshold: f64) -> DashboardSummary {
    let mut summary = DashboardSummary {
        instance_count: 0,
        running_instances: 0,
        average_cpu: None,
        cpu_alerts: 0,
        database_count: 0,
        databases_available: 0,
    };

    for state in states {
        match &state.record {
            Some(Record::Instances(instances)) => {
                summary.instance_count = instances.len();
                summary.running_instances =
                    instances.iter().filter(|i| i.state == "running").count();
                summary.cpu_alerts = instances
                    .iter()
                    .filter(|i| i.cpu_utilization.is_some_and(|c| c >= cpu_alert_threshold))
                    .count();

                let cpus: Vec<f64> = instances.iter().filter_map(|i| i.cpu_utilization).collect();
                if !cpus.is_empty() {
                    let mean = cpus.iter().sum::<f64>() / cpus.len() as f64;
                    summary.average_cpu = Some((mean * 100.0).round() / 100.0);
                }
            }
            Some(Record::Databases(dbs)) => {
                summary.database_count = dbs.len();
                summary.databases_available =
                    dbs.iter().filter(|d| d.status == "available").count();
            }
            _ => {}
        }
    }

    summary
}

/// Assemble the merged response for `GET /api/sources`.
pub fn merge(states: Vec<SourceState>, cpu_alert_threshold: f64) -> MergedResponse {
    let degraded = states.iter().any(|s| s.status == SourceStatus::Failing);
    let summary = summarize(&states, cpu_alert_threshold);
    let sources = states
        .into_iter()
        .map(|s| (s.source, SourceView::from(s)))
        .collect();

    MergedResponse {
        sources,
        degraded,
        summary,
    }
}
