// src/config.rs
//! Runtime configuration: listen address, gateway base URL, poll cadences.
//!
//! Resolution order:
//! 1) `$CLOUDVIEW_CONFIG` (must point at an existing TOML file)
//! 2) `config/cloudview.toml` if present
//! 3) built-in defaults
//! `CLOUDVIEW_LISTEN_ADDR` / `CLOUDVIEW_GATEWAY_URL` override either way.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poller::PollerConfig;
use crate::source::SourceId;

const ENV_CONFIG_PATH: &str = "CLOUDVIEW_CONFIG";
const ENV_LISTEN_ADDR: &str = "CLOUDVIEW_LISTEN_ADDR";
const ENV_GATEWAY_URL: &str = "CLOUDVIEW_GATEWAY_URL";
const DEFAULT_CONFIG_PATH: &str = "config/cloudview.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    pub listen_addr: String,
    /// Base URL of the metrics gateway all adapters pull from.
    pub gateway_url: String,
    /// Cadence for status-type sources (instance/database/website/log lists).
    pub status_poll_secs: u64,
    /// Cadence for time-series metric sources.
    pub metrics_poll_secs: u64,
    /// Failure streak beyond which stale data is downgraded to failing.
    pub failure_threshold: u32,
    /// CPU percentage at which an instance counts as alerting.
    pub cpu_alert_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5001".to_string(),
            gateway_url: "http://localhost:9090/api".to_string(),
            status_poll_secs: 30,
            metrics_poll_secs: 60,
            failure_threshold: 5,
            cpu_alert_threshold: 80.0,
        }
    }
}

impl AppConfig {
    /// Load using the resolution order documented at module level.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("CLOUDVIEW_CONFIG points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };

        if let Ok(addr) = std::env::var(ENV_LISTEN_ADDR) {
            cfg.listen_addr = addr;
        }
        if let Ok(url) = std::env::var(ENV_GATEWAY_URL) {
            cfg.gateway_url = url;
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Poll interval for one source. Listing-type sources refresh faster
    /// than metric series, mirroring how the dashboard consumes them.
    pub fn interval_for(&self, source: SourceId) -> Duration {
        let secs = match source {
            SourceId::Instances | SourceId::Databases | SourceId::Websites | SourceId::Logs => {
                self.status_poll_secs
            }
            SourceId::Apm
            | SourceId::Rum
            | SourceId::Network
            | SourceId::Disk
            | SourceId::ServerMetrics => self.metrics_poll_secs,
        };
        Duration::from_secs(secs.max(1))
    }

    pub fn poller_config(&self, source: SourceId) -> PollerConfig {
        PollerConfig::for_interval(self.interval_for(source), self.failure_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.failure_threshold, 5);
        assert!(cfg.status_poll_secs < cfg.metrics_poll_secs);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            gateway_url = "http://gateway.internal/api"
            status_poll_secs = 15
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gateway_url, "http://gateway.internal/api");
        assert_eq!(cfg.status_poll_secs, 15);
        assert_eq!(cfg.metrics_poll_secs, 60);
        assert_eq!(cfg.cpu_alert_threshold, 80.0);
    }

    #[test]
    fn listing_sources_poll_faster_than_metric_sources() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.interval_for(SourceId::Instances),
            Duration::from_secs(30)
        );
        assert_eq!(cfg.interval_for(SourceId::Apm), Duration::from_secs(60));
        // timeout always below interval, so polls can't overlap
        let pc = cfg.poller_config(SourceId::Instances);
        assert!(pc.timeout < pc.interval);
    }
}
