//! Application performance metrics: API latency, error rate, throughput.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::source::{ApmReport, Record, SeriesSummary, SourceId};
use crate::sources::{SeriesBody, SourceAdapter, UpstreamClient};

pub struct ApmAdapter {
    client: UpstreamClient,
}

impl ApmAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    async fn points(
        &self,
        metric: &str,
        timeout: Duration,
    ) -> Result<Vec<crate::source::MetricPoint>, AdapterError> {
        let body: SeriesBody = self
            .client
            .get_json(&format!("metrics/{metric}"), timeout)
            .await?;
        Ok(body.into_points())
    }
}

#[async_trait]
impl SourceAdapter for ApmAdapter {
    fn source(&self) -> SourceId {
        SourceId::Apm
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let api_latency = SeriesSummary::from_points(self.points("api-latency", timeout).await?);
        let max_latency = self.points("api-latency-max", timeout).await?;
        let error_rate = self.points("error-rate", timeout).await?;
        let throughput = self.points("throughput", timeout).await?;

        Ok(Record::Apm(ApmReport {
            api_latency,
            max_latency,
            error_rate,
            throughput,
        }))
    }
}
