//! api.rs — HTTP surface for the automation pipeline.
//!
//! Thin layer over [`AutomationSystem`]: every handler returns a complete
//! structured payload, never an error status for a degraded result
//! (graceful degradation happens below this layer).

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::automation::{AutomationRecord, AutomationStats, AutomationSystem, InboundComment};

#[derive(Clone)]
pub struct AppState {
    pub automation: Arc<AutomationSystem>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/process-comment", post(process_comment))
        .route("/process-batch", post(process_batch))
        .route("/automation-stats", get(automation_stats))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn process_comment(
    State(state): State<AppState>,
    Json(inbound): Json<InboundComment>,
) -> Json<AutomationRecord> {
    Json(state.automation.handle(inbound).await)
}

async fn process_batch(
    State(state): State<AppState>,
    Json(inbound): Json<Vec<InboundComment>>,
) -> Json<Vec<AutomationRecord>> {
    Json(state.automation.handle_batch(inbound).await)
}

async fn automation_stats(State(state): State<AppState>) -> Json<AutomationStats> {
    Json(state.automation.stats())
}
