//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::recommend::RecommendationFetcher;
use crate::state::ObservationStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The one observation store of this process
    pub store: Arc<ObservationStore>,
    /// Background recommendation fetcher (optional)
    pub fetcher: Option<Arc<RecommendationFetcher>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create an AppState without a recommendation fetcher
    pub fn new(store: Arc<ObservationStore>) -> Self {
        Self {
            store,
            fetcher: None,
            start_time: Instant::now(),
        }
    }

    /// Create an AppState with a running recommendation fetcher
    pub fn with_fetcher(store: Arc<ObservationStore>, fetcher: Arc<RecommendationFetcher>) -> Self {
        Self {
            store,
            fetcher: Some(fetcher),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if the recommendation fetcher is running
    pub fn has_fetcher(&self) -> bool {
        self.fetcher.is_some()
    }
}
