//! Host-level server metrics: cpu/memory/disk with current + history,
//! plus network in/out history.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::source::{Record, SeriesSummary, ServerReport, SourceId};
use crate::sources::{SeriesBody, SourceAdapter, UpstreamClient};

pub struct ServerMetricsAdapter {
    client: UpstreamClient,
}

impl ServerMetricsAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    async fn series(&self, metric: &str, timeout: Duration) -> Result<SeriesSummary, AdapterError> {
        let body: SeriesBody = self
            .client
            .get_json(&format!("metrics/{metric}"), timeout)
            .await?;
        Ok(SeriesSummary::from_points(body.into_points()))
    }
}

#[async_trait]
impl SourceAdapter for ServerMetricsAdapter {
    fn source(&self) -> SourceId {
        SourceId::ServerMetrics
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let cpu = self.series("cpu", timeout).await?;
        let memory = self.series("memory", timeout).await?;
        let disk = self.series("disk", timeout).await?;
        let network_in = self.series("network-in", timeout).await?.history;
        let network_out = self.series("network-out", timeout).await?.history;

        Ok(Record::ServerMetrics(ServerReport {
            cpu,
            memory,
            disk,
            network_in,
            network_out,
        }))
    }
}
