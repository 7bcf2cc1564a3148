//! Firewatch REST API
//!
//! HTTP API for dashboard front-ends, built with Axum.
//!
//! # Endpoints
//!
//! ## Observation
//! - `GET /api/v1/state` - Current observation state
//! - `POST /api/v1/actions` - Dispatch one action or a list of actions
//! - `POST /api/v1/observation` - Partial observation update
//! - `POST /api/v1/reset` - Restore the default state
//!
//! ## Recommendations
//! - `GET /api/v1/recommendations` - Safety panel view
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use firewatch::api::{serve, AppState};
//! use firewatch::config::ApiConfig;
//! use firewatch::state::ObservationStore;
//! use firewatch::storage::MemorySnapshotStorage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(ObservationStore::load(Arc::new(MemorySnapshotStorage::new())));
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(store), &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Observation routes
        .route("/state", get(routes::observation::get_state))
        .route("/actions", post(routes::observation::dispatch_actions))
        .route("/observation", post(routes::observation::update_observation))
        .route("/reset", post(routes::observation::reset))
        // Recommendation routes
        .route(
            "/recommendations",
            get(routes::recommendations::get_recommendations),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Firewatch API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Firewatch API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Action, ObservationState, ObservationStore};
    use crate::storage::MemorySnapshotStorage;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<ObservationStore>) {
        let store = Arc::new(ObservationStore::load(Arc::new(MemorySnapshotStorage::new())));
        let router = build_router(AppState::new(store.clone()));
        (router, store)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["recommendations"], "disabled");
    }

    #[tokio::test]
    async fn test_get_state() {
        let (app, store) = create_test_app();
        store.dispatch(Action::SetLatitude(64.8));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["currentLatitude"], 64.8);
        assert_eq!(json["currentSeverity"], 0);
    }

    #[tokio::test]
    async fn test_dispatch_actions() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/actions",
                r#"[
                    {"type": "SET_CURRENT_LATITUDE", "payload": 34.05},
                    {"type": "SET_MAP_ZOOM", "payload": 7},
                    {"type": "SET_TOTAL_ACTIVE_FIRES", "payload": 3}
                ]"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let state = store.snapshot();
        assert_eq!(state.latitude, Some(34.05));
        assert_eq!(state.active_fire_count, Some(3));
    }

    #[tokio::test]
    async fn test_update_observation_validation() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(post_json("/api/v1/observation", r#"{"latitude": 120.0}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.snapshot(), ObservationState::default());
    }

    #[tokio::test]
    async fn test_update_observation() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/observation",
                r#"{"latitude": 21.3, "longitude": -157.8, "weather": "Trade winds", "selected_region": "HI"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let state = store.snapshot();
        assert_eq!(state.latitude, Some(21.3));
        assert_eq!(state.selected_region.as_deref(), Some("HI"));
    }

    #[tokio::test]
    async fn test_reset() {
        let (app, store) = create_test_app();
        store.dispatch(Action::SetSeverity(4));

        let response = app
            .oneshot(post_json("/api/v1/reset", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.snapshot(), ObservationState::default());
    }

    #[tokio::test]
    async fn test_recommendations_placeholder() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/recommendations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["panel"]["view"]["status"], "placeholder");
        assert_eq!(json["fetcher_enabled"], false);
        assert!(json.get("fetcher").is_none());
    }

    #[tokio::test]
    async fn test_recommendations_with_fetcher() {
        use crate::recommend::{HttpRecommendationClient, RecommendationConfig, RecommendationFetcher};

        let store = Arc::new(ObservationStore::load(Arc::new(MemorySnapshotStorage::new())));
        let client = HttpRecommendationClient::new(RecommendationConfig::default()).unwrap();
        let fetcher = Arc::new(RecommendationFetcher::new(store.clone(), Arc::new(client)));
        let app = build_router(AppState::with_fetcher(store, fetcher));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/recommendations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["fetcher_enabled"], true);
        assert_eq!(json["fetcher"]["loading"], false);
        assert_eq!(json["fetcher"]["error"], "");
        assert_eq!(json["fetcher"]["recommendations"], serde_json::json!([]));
    }
}
