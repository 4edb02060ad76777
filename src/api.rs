use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::aggregate::{merge, SourceView};
use crate::source::SourceId;
use crate::store::SnapshotStore;

/// Shared state for the query handlers. Handlers only ever read the
/// snapshot store — a request never triggers a live upstream call.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub cpu_alert_threshold: f64,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/sources", get(all_sources))
        .route("/api/sources/{source}", get(one_source))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// `GET /api/sources/{source}` — one source's current state.
///
/// Unknown ids are the only client-facing error here (404). A source whose
/// upstream is down still answers 200: stale or absent data is a valid,
/// expressable state, not a server failure.
async fn one_source(State(state): State<AppState>, Path(source): Path<String>) -> Response {
    let id = match source.parse::<SourceId>() {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    counter!("cloudview_snapshot_reads_total").increment(1);
    Json(SourceView::from(state.store.get(id))).into_response()
}

/// `GET /api/sources` — every source plus derived aggregates and the
/// overall degraded flag. Aggregates are recomputed on each read.
async fn all_sources(State(state): State<AppState>) -> Response {
    counter!("cloudview_snapshot_reads_total").increment(1);
    let merged = merge(state.store.snapshot_all(), state.cpu_alert_threshold);
    Json(merged).into_response()
}
