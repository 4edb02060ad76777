// src/sources/mod.rs
//! Source adapters: one per upstream data source.
//!
//! Each adapter performs one upstream call (or a small fixed batch of
//! related calls) against the metrics gateway and converts the vendor shape
//! into the system's normalized [`Record`]. Adapters never retry and never
//! touch shared state — retry policy and publication belong to the poller.

pub mod apm;
pub mod databases;
pub mod disk;
pub mod instances;
pub mod logs;
pub mod network;
pub mod rum;
pub mod server_metrics;
pub mod websites;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AdapterError;
use crate::source::{MetricPoint, Record, SourceId};

/// Contract every upstream adapter implements.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The source this adapter produces records for.
    fn source(&self) -> SourceId;

    /// One fetch + normalize pass, bounded by `timeout`.
    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError>;
}

/// Thin reqwest wrapper for the metrics gateway. Cheap to clone; all
/// adapters share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base: String,
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(base: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cloudview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base: base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// GET `{base}/{path}` and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, AdapterError> {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        let resp = self.client.get(&url).timeout(timeout).send().await?;

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AdapterError::Auth(format!("{url} -> {status}")));
        }
        if !status.is_success() {
            return Err(AdapterError::Status(status.as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))
    }
}

/// Upstream datapoint series, the common shape for gateway metric queries.
#[derive(Debug, Deserialize)]
pub(crate) struct SeriesBody {
    pub datapoints: Vec<Datapoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub average: f64,
}

impl SeriesBody {
    /// Normalize to metric points sorted oldest-first.
    pub(crate) fn into_points(self) -> Vec<MetricPoint> {
        let mut points: Vec<MetricPoint> = self
            .datapoints
            .into_iter()
            .map(|d| MetricPoint {
                timestamp: d.timestamp,
                value: d.average,
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}

/// Round to 2 decimals for display parity with the upstream consoles.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// The full adapter set against one gateway, one adapter per configured
/// source.
pub fn build_adapters(client: &UpstreamClient) -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(instances::InstancesAdapter::new(client.clone())),
        Arc::new(databases::DatabasesAdapter::new(client.clone())),
        Arc::new(logs::LogsAdapter::new(client.clone())),
        Arc::new(apm::ApmAdapter::new(client.clone())),
        Arc::new(rum::RumAdapter::new(client.clone())),
        Arc::new(network::NetworkAdapter::new(client.clone())),
        Arc::new(websites::WebsitesAdapter::new(client.clone())),
        Arc::new(disk::DiskAdapter::new(client.clone())),
        Arc::new(server_metrics::ServerMetricsAdapter::new(client.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_points_are_sorted_oldest_first() {
        let body: SeriesBody = serde_json::from_str(
            r#"{"datapoints":[
                {"timestamp":"2026-08-30T10:05:00Z","average":2.0},
                {"timestamp":"2026-08-30T10:00:00Z","average":1.0}
            ]}"#,
        )
        .unwrap();
        let points = body.into_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[1].value, 2.0);
    }

    #[test]
    fn build_adapters_covers_every_source() {
        let client = UpstreamClient::new("http://localhost:9090/api").unwrap();
        let adapters = build_adapters(&client);
        let mut sources: Vec<SourceId> = adapters.iter().map(|a| a.source()).collect();
        sources.sort();
        let mut all = SourceId::ALL.to_vec();
        all.sort();
        assert_eq!(sources, all);
    }

    #[test]
    fn rounding_matches_display_precision() {
        assert_eq!(round2(85.6789), 85.68);
        assert_eq!(round2(0.004), 0.0);
    }
}
