//! Managed database listing (id, availability status, engine).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AdapterError;
use crate::source::{DatabaseSummary, Record, SourceId};
use crate::sources::{SourceAdapter, UpstreamClient};

#[derive(Debug, Deserialize)]
struct DatabaseListBody {
    instances: Vec<DatabaseItem>,
}

#[derive(Debug, Deserialize)]
struct DatabaseItem {
    id: String,
    status: String,
    engine: String,
}

pub struct DatabasesAdapter {
    client: UpstreamClient,
}

impl DatabasesAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for DatabasesAdapter {
    fn source(&self) -> SourceId {
        SourceId::Databases
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let list: DatabaseListBody = self.client.get_json("rds/instances", timeout).await?;
        let out = list
            .instances
            .into_iter()
            .map(|db| DatabaseSummary {
                id: db.id,
                status: db.status,
                engine: db.engine,
            })
            .collect();
        Ok(Record::Databases(out))
    }
}
