//! Observation Routes
//!
//! Read the observation state and change it through actions.
//!
//! - GET /api/v1/state - Current snapshot
//! - POST /api/v1/actions - Dispatch one action or a list of actions
//! - POST /api/v1/observation - Partial observation update
//! - POST /api/v1/reset - Restore the default state

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ActionBatch, ObservationUpdate};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::state::{Action, ObservationState};

/// GET /api/v1/state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<ObservationState> {
    Json(state.store.snapshot())
}

/// POST /api/v1/actions
///
/// Actions are applied in order; unknown action types are ignored.
pub async fn dispatch_actions(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<ActionBatch>,
) -> Json<ObservationState> {
    let actions = batch.into_actions();
    tracing::debug!(count = actions.len(), "Dispatching actions from API");
    Json(state.store.dispatch_all(actions))
}

/// POST /api/v1/observation
pub async fn update_observation(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ObservationUpdate>,
) -> ApiResult<Json<ObservationState>> {
    update.validate().map_err(ApiError::Validation)?;

    let actions = update.into_actions();
    if actions.is_empty() {
        return Err(ApiError::Validation(
            "observation update contains no fields".to_string(),
        ));
    }

    Ok(Json(state.store.dispatch_all(actions)))
}

/// POST /api/v1/reset
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<ObservationState> {
    tracing::info!("Resetting observation state");
    Json(state.store.dispatch_all([Action::ResetAll]))
}
