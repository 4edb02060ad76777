//! Disk space utilization: used/available series plus a derived total.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::source::{DiskReport, MetricPoint, Record, SourceId};
use crate::sources::{round2, SeriesBody, SourceAdapter, UpstreamClient};

pub struct DiskAdapter {
    client: UpstreamClient,
}

impl DiskAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

/// Total = latest used + latest available; 0 when either series is empty,
/// matching the upstream console's behavior for missing filesystems.
fn derive_total(used: &[MetricPoint], available: &[MetricPoint]) -> f64 {
    match (used.last(), available.last()) {
        (Some(u), Some(a)) => round2(u.value + a.value),
        _ => 0.0,
    }
}

#[async_trait]
impl SourceAdapter for DiskAdapter {
    fn source(&self) -> SourceId {
        SourceId::Disk
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let used: SeriesBody = self.client.get_json("metrics/disk-used", timeout).await?;
        let available: SeriesBody = self
            .client
            .get_json("metrics/disk-available", timeout)
            .await?;

        let used = used.into_points();
        let available = available.into_points();
        let total = derive_total(&used, &available);

        Ok(Record::Disk(DiskReport {
            used,
            available,
            total,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn point(value: f64) -> MetricPoint {
        MetricPoint {
            timestamp: Utc::now(),
            value,
        }
    }

    #[test]
    fn total_sums_latest_readings() {
        let used = vec![point(40.0)];
        let available = vec![point(60.5)];
        assert_eq!(derive_total(&used, &available), 100.5);
    }

    #[test]
    fn total_is_zero_when_a_series_is_missing() {
        assert_eq!(derive_total(&[point(40.0)], &[]), 0.0);
        assert_eq!(derive_total(&[], &[]), 0.0);
    }
}
