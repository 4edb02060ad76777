//! Compute instance listing with per-instance CPU attached.
//!
//! Two-step batch: list instances, then pull the recent CPU series for each
//! one. Instances without datapoints report `cpu_utilization: null` —
//! "no telemetry" must stay distinguishable from "0% load".

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AdapterError;
use crate::source::{InstanceSummary, MetricPoint, Record, SourceId};
use crate::sources::{round2, SeriesBody, SourceAdapter, UpstreamClient};

#[derive(Debug, Deserialize)]
struct InstanceListBody {
    instances: Vec<InstanceItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceItem {
    id: String,
    state: String,
    instance_type: String,
    launch_time: Option<DateTime<Utc>>,
}

pub struct InstancesAdapter {
    client: UpstreamClient,
}

impl InstancesAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

/// Latest average of a datapoint series, rounded for display.
fn latest_cpu(points: &[MetricPoint]) -> Option<f64> {
    points.last().map(|p| round2(p.value))
}

fn normalize(item: InstanceItem, cpu_points: &[MetricPoint]) -> InstanceSummary {
    InstanceSummary {
        cpu_utilization: latest_cpu(cpu_points),
        id: item.id,
        state: item.state,
        instance_type: item.instance_type,
        launch_time: item.launch_time,
    }
}

#[async_trait]
impl SourceAdapter for InstancesAdapter {
    fn source(&self) -> SourceId {
        SourceId::Instances
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let list: InstanceListBody = self.client.get_json("ec2/instances", timeout).await?;

        let mut out = Vec::with_capacity(list.instances.len());
        for item in list.instances {
            let series: SeriesBody = self
                .client
                .get_json(&format!("ec2/instances/{}/cpu", item.id), timeout)
                .await?;
            out.push(normalize(item, &series.into_points()));
        }
        Ok(Record::Instances(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> InstanceItem {
        InstanceItem {
            id: id.into(),
            state: "running".into(),
            instance_type: "t3.micro".into(),
            launch_time: None,
        }
    }

    #[test]
    fn cpu_comes_from_newest_point_rounded() {
        let points = vec![
            MetricPoint {
                timestamp: Utc::now() - chrono::Duration::minutes(5),
                value: 10.0,
            },
            MetricPoint {
                timestamp: Utc::now(),
                value: 85.6789,
            },
        ];
        let s = normalize(item("i-1"), &points);
        assert_eq!(s.cpu_utilization, Some(85.68));
    }

    #[test]
    fn missing_cpu_series_stays_null() {
        let s = normalize(item("i-2"), &[]);
        assert_eq!(s.cpu_utilization, None);
        assert_eq!(s.state, "running");
    }
}
