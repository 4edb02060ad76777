//! Real-user monitoring: page load time, interactions, client-side errors.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::source::{MetricPoint, Record, RumReport, SeriesSummary, SourceId};
use crate::sources::{SeriesBody, SourceAdapter, UpstreamClient};

pub struct RumAdapter {
    client: UpstreamClient,
}

impl RumAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    async fn points(
        &self,
        metric: &str,
        timeout: Duration,
    ) -> Result<Vec<MetricPoint>, AdapterError> {
        let body: SeriesBody = self
            .client
            .get_json(&format!("metrics/{metric}"), timeout)
            .await?;
        Ok(body.into_points())
    }
}

#[async_trait]
impl SourceAdapter for RumAdapter {
    fn source(&self) -> SourceId {
        SourceId::Rum
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let page_load_time =
            SeriesSummary::from_points(self.points("page-load-time", timeout).await?);
        let user_interactions = self.points("user-interactions", timeout).await?;
        let client_errors = self.points("client-errors", timeout).await?;

        Ok(Record::Rum(RumReport {
            page_load_time,
            user_interactions,
            client_errors,
        }))
    }
}
