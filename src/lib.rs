//! # Firewatch
//!
//! Wildfire Observation Core - the shared state behind a wildfire-monitoring
//! dashboard and the AI safety recommendations derived from it.
//!
//! ## Features
//!
//! - **Single source of truth**: One observation store, changed only by actions
//! - **Durability**: Every transition is mirrored to a snapshot slot
//! - **Recommendations**: A fetcher reacts to watched fields and asks a
//!   remote service for safety advice
//! - **HTTP API**: Dashboards read state and dispatch actions over JSON
//!
//! ## Modules
//!
//! - [`state`]: Observation record, actions, reducer, and store
//! - [`storage`]: Snapshot slots (file and memory)
//! - [`recommend`]: Recommendation client, fetcher, and panel view
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use firewatch::recommend::{HttpRecommendationClient, RecommendationConfig, RecommendationFetcher};
//! use firewatch::state::{Action, ObservationStore};
//! use firewatch::storage::{FileSnapshotStorage, SnapshotConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileSnapshotStorage::new(SnapshotConfig::new("./data")));
//!     let store = Arc::new(ObservationStore::load(storage));
//!
//!     let client = Arc::new(HttpRecommendationClient::new(RecommendationConfig::default())?);
//!     let fetcher = Arc::new(RecommendationFetcher::new(Arc::clone(&store), client));
//!     let handle = Arc::clone(&fetcher).start();
//!
//!     store.dispatch_all([
//!         Action::SetLatitude(34.05),
//!         Action::SetLongitude(-118.24),
//!         Action::SetSeverity(5),
//!         Action::SetWeather("Dry, windy".to_string()),
//!         Action::SetTotalActiveFires(3),
//!     ]);
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
//!     println!("{:?}", store.snapshot().recommendations);
//!
//!     handle.abort();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod recommend;
pub mod state;
pub mod storage;

// Re-export top-level types for convenience
pub use state::{reduce, Action, ObservationState, ObservationStore, StoreStats, WatchedFields};

pub use storage::{
    FileSnapshotStorage, MemorySnapshotStorage, SnapshotConfig, SnapshotStorage, StorageError,
    StorageResult,
};

pub use recommend::{
    split_recommendations, CycleOutcome, HttpRecommendationClient, PanelReport, PanelState,
    PanelView, RecommendationConfig, RecommendationError, RecommendationFetcher,
    RecommendationRequest, RecommendationSource, RECOMMENDATION_ERROR,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, ResolvedConfig};
