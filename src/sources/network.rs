//! Network throughput (inbound/outbound bytes-per-second series).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::source::{NetworkReport, Record, SourceId};
use crate::sources::{SeriesBody, SourceAdapter, UpstreamClient};

pub struct NetworkAdapter {
    client: UpstreamClient,
}

impl NetworkAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for NetworkAdapter {
    fn source(&self) -> SourceId {
        SourceId::Network
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let inbound: SeriesBody = self.client.get_json("metrics/network-in", timeout).await?;
        let outbound: SeriesBody = self.client.get_json("metrics/network-out", timeout).await?;

        Ok(Record::Network(NetworkReport {
            inbound: inbound.into_points(),
            outbound: outbound.into_points(),
        }))
    }
}
