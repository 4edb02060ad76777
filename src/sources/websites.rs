//! Website availability checks (health, latency, last-checked).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AdapterError;
use crate::source::{Record, SourceId, WebsiteCheck};
use crate::sources::{round2, SourceAdapter, UpstreamClient};

#[derive(Debug, Deserialize)]
struct CheckListBody {
    checks: Vec<CheckItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckItem {
    url: String,
    healthy: bool,
    latency_ms: Option<f64>,
    checked_at: DateTime<Utc>,
}

pub struct WebsitesAdapter {
    client: UpstreamClient,
}

impl WebsitesAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for WebsitesAdapter {
    fn source(&self) -> SourceId {
        SourceId::Websites
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let list: CheckListBody = self.client.get_json("websites/checks", timeout).await?;
        let out = list
            .checks
            .into_iter()
            .map(|c| WebsiteCheck {
                url: c.url,
                healthy: c.healthy,
                latency_ms: c.latency_ms.map(round2),
                checked_at: c.checked_at,
            })
            .collect();
        Ok(Record::Websites(out))
    }
}
