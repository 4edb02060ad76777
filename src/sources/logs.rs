//! Log group listing plus the most recent events across groups.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AdapterError;
use crate::source::{LogEvent, LogReport, Record, SourceId};
use crate::sources::{SourceAdapter, UpstreamClient};

/// Upstream event page size; also the hard cap we keep in the record.
const EVENT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct GroupListBody {
    groups: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EventListBody {
    events: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventItem {
    timestamp: DateTime<Utc>,
    message: String,
    log_stream: String,
}

pub struct LogsAdapter {
    client: UpstreamClient,
}

impl LogsAdapter {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

/// Keep only the newest `EVENT_LIMIT` events, newest first.
fn normalize_events(items: Vec<EventItem>) -> Vec<LogEvent> {
    let mut events: Vec<LogEvent> = items
        .into_iter()
        .map(|e| LogEvent {
            timestamp: e.timestamp,
            message: e.message,
            log_stream: e.log_stream,
        })
        .collect();
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(EVENT_LIMIT);
    events
}

#[async_trait]
impl SourceAdapter for LogsAdapter {
    fn source(&self) -> SourceId {
        SourceId::Logs
    }

    async fn fetch(&self, timeout: Duration) -> Result<Record, AdapterError> {
        let groups: GroupListBody = self.client.get_json("logs/groups", timeout).await?;
        let events: EventListBody = self
            .client
            .get_json(&format!("logs/events?limit={EVENT_LIMIT}"), timeout)
            .await?;

        Ok(Record::Logs(LogReport {
            groups: groups.groups,
            events: normalize_events(events.events),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(secs_ago: i64, msg: &str) -> EventItem {
        EventItem {
            timestamp: Utc::now() - chrono::Duration::seconds(secs_ago),
            message: msg.into(),
            log_stream: "app/main".into(),
        }
    }

    #[test]
    fn events_sorted_newest_first_and_capped() {
        let items: Vec<EventItem> = (0..150).map(|i| event(i, &format!("m{i}"))).collect();
        let events = normalize_events(items);
        assert_eq!(events.len(), EVENT_LIMIT);
        assert_eq!(events[0].message, "m0"); // newest
        assert!(events[0].timestamp >= events[1].timestamp);
    }
}
