//! Recommendation Routes
//!
//! - GET /api/v1/recommendations - What the safety panel shows right now

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::RecommendationsResponse;
use crate::api::state::AppState;
use crate::recommend::PanelReport;

/// GET /api/v1/recommendations
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
) -> Json<RecommendationsResponse> {
    let snapshot = state.store.snapshot();

    Json(RecommendationsResponse {
        panel: PanelReport::from_state(&snapshot),
        fetcher_enabled: state.has_fetcher(),
        fetcher: state.fetcher.as_ref().map(|f| f.panel()),
    })
}
