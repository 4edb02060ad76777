// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod source;
pub mod store;

// Upstream source adapters (one module per data source)
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{DashboardSummary, MergedResponse, SourceView, ViewStatus};
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::{AdapterError, UnknownSource};
pub use crate::poller::{poll_once, spawn_poller, PollerConfig};
pub use crate::source::{Record, SourceId, SourceState, SourceStatus};
pub use crate::store::SnapshotStore;
