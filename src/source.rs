//! # Source model
//! The fixed set of upstream data sources, their normalized record shapes,
//! and the per-source state machine (`Fresh | Stale | Failing | Unknown`).
//!
//! Records are produced exclusively by the matching adapter in
//! `crate::sources` and replaced wholesale on each successful poll; the rest
//! of the system treats them as opaque payloads tagged by [`SourceId`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownSource;

/// Identifier for one upstream data source. The set is fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    Instances,
    Databases,
    Logs,
    Apm,
    Rum,
    Network,
    Websites,
    Disk,
    ServerMetrics,
}

impl SourceId {
    /// Every configured source, in stable (serialization) order.
    pub const ALL: [SourceId; 9] = [
        SourceId::Instances,
        SourceId::Databases,
        SourceId::Logs,
        SourceId::Apm,
        SourceId::Rum,
        SourceId::Network,
        SourceId::Websites,
        SourceId::Disk,
        SourceId::ServerMetrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Instances => "instances",
            SourceId::Databases => "databases",
            SourceId::Logs => "logs",
            SourceId::Apm => "apm",
            SourceId::Rum => "rum",
            SourceId::Network => "network",
            SourceId::Websites => "websites",
            SourceId::Disk => "disk",
            SourceId::ServerMetrics => "server-metrics",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// One timestamped metric observation, normalized from upstream datapoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A metric with its latest value pulled out for at-a-glance display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Latest observed value, `None` when the upstream series was empty.
    pub current: Option<f64>,
    pub history: Vec<MetricPoint>,
}

impl SeriesSummary {
    /// Build from an upstream datapoint series; `current` is the newest point.
    pub fn from_points(mut history: Vec<MetricPoint>) -> Self {
        history.sort_by_key(|p| p.timestamp);
        let current = history.last().map(|p| p.value);
        Self { current, history }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSummary {
    pub id: String,
    pub state: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub launch_time: Option<DateTime<Utc>>,
    /// Latest 5-minute average CPU, rounded to 2 decimals.
    /// `None` means no datapoints were reported, not 0% load.
    pub cpu_utilization: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSummary {
    pub id: String,
    pub status: String,
    pub engine: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub log_stream: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogReport {
    pub groups: Vec<String>,
    pub events: Vec<LogEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReport {
    pub inbound: Vec<MetricPoint>,
    pub outbound: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskReport {
    pub used: Vec<MetricPoint>,
    pub available: Vec<MetricPoint>,
    /// Sum of the latest used + available readings, 0 when either is empty.
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerReport {
    pub cpu: SeriesSummary,
    pub memory: SeriesSummary,
    pub disk: SeriesSummary,
    pub network_in: Vec<MetricPoint>,
    pub network_out: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApmReport {
    pub api_latency: SeriesSummary,
    pub max_latency: Vec<MetricPoint>,
    pub error_rate: Vec<MetricPoint>,
    pub throughput: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RumReport {
    pub page_load_time: SeriesSummary,
    pub user_interactions: Vec<MetricPoint>,
    pub client_errors: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteCheck {
    pub url: String,
    pub healthy: bool,
    pub latency_ms: Option<f64>,
    pub checked_at: DateTime<Utc>,
}

/// A normalized, source-specific payload. Serializes as the bare payload
/// (no enum tag) — the owning `SourceId` is always carried alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Instances(Vec<InstanceSummary>),
    Databases(Vec<DatabaseSummary>),
    Logs(LogReport),
    Apm(ApmReport),
    Rum(RumReport),
    Network(NetworkReport),
    Websites(Vec<WebsiteCheck>),
    Disk(DiskReport),
    ServerMetrics(ServerReport),
}

impl Record {
    pub fn source(&self) -> SourceId {
        match self {
            Record::Instances(_) => SourceId::Instances,
            Record::Databases(_) => SourceId::Databases,
            Record::Logs(_) => SourceId::Logs,
            Record::Apm(_) => SourceId::Apm,
            Record::Rum(_) => SourceId::Rum,
            Record::Network(_) => SourceId::Network,
            Record::Websites(_) => SourceId::Websites,
            Record::Disk(_) => SourceId::Disk,
            Record::ServerMetrics(_) => SourceId::ServerMetrics,
        }
    }
}

/// Health of one source's cached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Record present and produced by the most recent poll.
    Fresh,
    /// Record carried forward from an earlier success; recent poll(s) failed.
    Stale,
    /// No success ever, or the failure streak exceeded the trust threshold.
    Failing,
    /// No poll has completed yet.
    Unknown,
}

/// Everything known about one source: its cached record plus health metadata.
///
/// Owned by exactly one poller; every other component reads it via the
/// snapshot store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceState {
    pub source: SourceId,
    pub record: Option<Record>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub status: SourceStatus,
}

impl SourceState {
    /// Initial state before any poll has completed.
    pub fn unknown(source: SourceId) -> Self {
        Self {
            source,
            record: None,
            last_success_at: None,
            last_error: None,
            consecutive_failures: 0,
            status: SourceStatus::Unknown,
        }
    }

    /// Transition after a successful poll: the record is replaced wholesale
    /// and the failure streak resets.
    pub fn apply_success(&mut self, record: Record, now: DateTime<Utc>) {
        debug_assert_eq!(record.source(), self.source);
        self.record = Some(record);
        self.last_success_at = Some(now);
        self.last_error = None;
        self.consecutive_failures = 0;
        self.status = SourceStatus::Fresh;
    }

    /// Transition after a failed poll. A carried-forward record keeps the
    /// source `Stale` until the streak strictly exceeds `failure_threshold`,
    /// at which point the data is considered too old to trust.
    pub fn apply_failure(&mut self, error: String, failure_threshold: u32) {
        self.last_error = Some(error);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.status = if self.record.is_none() {
            SourceStatus::Failing
        } else if self.consecutive_failures > failure_threshold {
            SourceStatus::Failing
        } else {
            SourceStatus::Stale
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instances_record() -> Record {
        Record::Instances(vec![InstanceSummary {
            id: "i-1".into(),
            state: "running".into(),
            instance_type: "t3.micro".into(),
            launch_time: None,
            cpu_utilization: Some(12.5),
        }])
    }

    #[test]
    fn source_id_round_trips_through_str() {
        for id in SourceId::ALL {
            assert_eq!(id.as_str().parse::<SourceId>().unwrap(), id);
        }
        assert!("not-a-source".parse::<SourceId>().is_err());
    }

    #[test]
    fn success_resets_failure_streak() {
        let mut st = SourceState::unknown(SourceId::Instances);
        st.apply_failure("boom".into(), 5);
        st.apply_failure("boom".into(), 5);
        assert_eq!(st.consecutive_failures, 2);
        assert_eq!(st.status, SourceStatus::Failing); // no record yet

        st.apply_success(instances_record(), Utc::now());
        assert_eq!(st.consecutive_failures, 0);
        assert_eq!(st.status, SourceStatus::Fresh);
        assert!(st.last_error.is_none());
    }

    #[test]
    fn failure_with_prior_record_goes_stale_then_failing() {
        let mut st = SourceState::unknown(SourceId::Instances);
        st.apply_success(instances_record(), Utc::now());

        for n in 1..=5u32 {
            st.apply_failure(format!("err {n}"), 5);
            assert_eq!(st.consecutive_failures, n);
            assert_eq!(st.status, SourceStatus::Stale, "streak {n} within threshold");
        }

        // 6th straight failure strictly exceeds the threshold
        st.apply_failure("err 6".into(), 5);
        assert_eq!(st.status, SourceStatus::Failing);
        // the carried-forward record is still there
        assert!(st.record.is_some());
    }

    #[test]
    fn series_summary_picks_newest_point() {
        let base = Utc::now();
        let points = vec![
            MetricPoint {
                timestamp: base,
                value: 3.0,
            },
            MetricPoint {
                timestamp: base - chrono::Duration::minutes(5),
                value: 1.0,
            },
        ];
        let s = SeriesSummary::from_points(points);
        assert_eq!(s.current, Some(3.0));
        assert_eq!(s.history.len(), 2);
        assert_eq!(s.history.last().unwrap().value, 3.0);
    }

    #[test]
    fn empty_series_has_no_current_value() {
        let s = SeriesSummary::from_points(Vec::new());
        assert_eq!(s.current, None);
        assert!(s.history.is_empty());
    }
}
