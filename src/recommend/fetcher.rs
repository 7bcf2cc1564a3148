//! Recommendation Fetcher
//!
//! Watches the observation store and keeps the recommendation state in step
//! with the watched fields.
//!
//! ## Cycle
//!
//! 1. Required fields missing → reset recommendation state, stop
//! 2. Zero active fires → clear the list, stop
//! 3. Otherwise mark loading, call the source once, commit the parsed list
//!    or the fixed error message, and clear loading

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::client::{RecommendationRequest, RecommendationSource};
use super::parse::split_recommendations;
use crate::state::{Action, ObservationStore};

/// Message shown whenever a recommendation request fails
pub const RECOMMENDATION_ERROR: &str = "Could not generate recommendations.";

/// Recommendation state as held by the panel component
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelState {
    pub recommendations: Vec<String>,
    pub loading: bool,
    pub error: String,
}

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Coordinates or weather were missing
    NotReady,
    /// Required fields present but no active fires
    NoActiveFires,
    /// The source answered; number of entries committed
    Fetched(usize),
    /// The source failed
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Location {
    lat: Option<f64>,
    lng: Option<f64>,
}

/// Derives recommendations from the observation store
pub struct RecommendationFetcher {
    store: Arc<ObservationStore>,
    source: Arc<dyn RecommendationSource>,
    panel: Mutex<PanelState>,
    previous_location: Mutex<Location>,
}

impl RecommendationFetcher {
    /// Create a new fetcher
    pub fn new(store: Arc<ObservationStore>, source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            store,
            source,
            panel: Mutex::new(PanelState::default()),
            previous_location: Mutex::new(Location::default()),
        }
    }

    /// Current panel state
    pub fn panel(&self) -> PanelState {
        self.panel.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Start watching the store in a background task
    ///
    /// Runs one cycle immediately, then one per change of the watched
    /// fields. Changes that arrive during a request are evaluated once it
    /// completes.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::info!("Starting recommendation fetcher");
        tokio::spawn(async move { self.watch().await })
    }

    async fn watch(&self) {
        let mut rx = self.store.subscribe();
        let mut last_seen = rx.borrow_and_update().watched();

        self.run_cycle().await;

        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().watched();
            if current == last_seen {
                continue;
            }
            last_seen = current;
            self.run_cycle().await;
        }

        tracing::debug!("Observation store closed, recommendation fetcher stopping");
    }

    /// Evaluate the current state once
    pub async fn run_cycle(&self) -> CycleOutcome {
        let cycle_id = Uuid::new_v4();
        let state = self.store.snapshot();

        let Some(request) = RecommendationRequest::from_state(&state) else {
            tracing::debug!(cycle_id = %cycle_id, "Observation incomplete, resetting recommendations");
            self.update_panel(|p| *p = PanelState::default());
            self.store.dispatch(Action::ResetRecommendations);
            return CycleOutcome::NotReady;
        };

        if state.active_fire_count == Some(0) {
            tracing::info!(cycle_id = %cycle_id, "No active fires detected");
            self.update_panel(|p| p.recommendations.clear());
            self.store.dispatch(Action::SetRecommendations(Vec::new()));
            return CycleOutcome::NoActiveFires;
        }

        let location_changed = self.note_location(Location {
            lat: state.latitude,
            lng: state.longitude,
        });
        tracing::debug!(
            cycle_id = %cycle_id,
            location_changed,
            severity = request.severity,
            total_fires = request.total_fires,
            "Requesting recommendations"
        );

        self.update_panel(|p| {
            p.loading = true;
            p.error.clear();
        });
        self.store.dispatch(Action::SetRecommendationsLoading(true));
        self.store.dispatch(Action::SetRecommendationsError(String::new()));

        let outcome = match self.source.generate(&request).await {
            Ok(text) => {
                let recommendations = split_recommendations(&text);
                let count = recommendations.len();
                tracing::info!(cycle_id = %cycle_id, count, "Recommendations received");

                self.update_panel(|p| p.recommendations = recommendations.clone());
                self.store.dispatch(Action::SetRecommendations(recommendations));
                CycleOutcome::Fetched(count)
            }
            Err(e) => {
                tracing::warn!(cycle_id = %cycle_id, error = %e, "Recommendation request failed");

                self.update_panel(|p| {
                    p.recommendations.clear();
                    p.error = RECOMMENDATION_ERROR.to_string();
                });
                self.store.dispatch(Action::SetRecommendations(Vec::new()));
                self.store
                    .dispatch(Action::SetRecommendationsError(RECOMMENDATION_ERROR.to_string()));
                CycleOutcome::Failed
            }
        };

        self.update_panel(|p| p.loading = false);
        self.store.dispatch(Action::SetRecommendationsLoading(false));

        outcome
    }

    fn update_panel(&self, f: impl FnOnce(&mut PanelState)) {
        if let Ok(mut panel) = self.panel.lock() {
            f(&mut panel);
        }
    }

    /// Record the location of this cycle; true if it differs from the last one
    fn note_location(&self, current: Location) -> bool {
        match self.previous_location.lock() {
            Ok(mut previous) => {
                let changed = *previous != current;
                *previous = current;
                changed
            }
            Err(_) => true,
        }
    }
}
