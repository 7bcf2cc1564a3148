//! Recommendation Service Client
//!
//! HTTP client for the remote service that turns an observation into
//! safety advice text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::state::ObservationState;

/// Default endpoint of the recommendation service
pub const DEFAULT_ENDPOINT: &str =
    "https://us-central1-catalytica-b8ad9.cloudfunctions.net/generateRecommendations";

/// Anything that can produce recommendation text for an observation
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Return the raw recommendation text for `request`
    async fn generate(&self, request: &RecommendationRequest) -> Result<String, RecommendationError>;
}

/// Configuration for the HTTP recommendation client
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Full URL the observation is POSTed to
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Observation payload sent to the recommendation service
///
/// Key names are fixed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub lat: f64,
    pub lng: f64,
    pub severity: i64,
    pub weather: String,
    #[serde(rename = "Temp")]
    pub temp: Option<f64>,
    #[serde(rename = "Wind")]
    pub wind: Option<f64>,
    #[serde(rename = "Humidity")]
    pub humidity: Option<f64>,
    pub population: Option<f64>,
    #[serde(rename = "totalFires")]
    pub total_fires: u64,
    pub region: Option<String>,
}

impl RecommendationRequest {
    /// Build the payload, or `None` if coordinates or weather are missing
    pub fn from_state(state: &ObservationState) -> Option<Self> {
        Some(Self {
            lat: state.latitude?,
            lng: state.longitude?,
            severity: state.severity,
            weather: state.weather.clone()?,
            temp: state.temperature,
            wind: state.wind_speed,
            humidity: state.humidity,
            population: state.population,
            total_fires: state.active_fire_count.unwrap_or(0),
            region: state.selected_region.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationResponse {
    recommendations: String,
}

/// reqwest-backed recommendation client
pub struct HttpRecommendationClient {
    client: Client,
    config: RecommendationConfig,
}

impl HttpRecommendationClient {
    /// Create a new client with the given configuration
    pub fn new(config: RecommendationConfig) -> Result<Self, RecommendationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }
}

#[async_trait]
impl RecommendationSource for HttpRecommendationClient {
    async fn generate(&self, request: &RecommendationRequest) -> Result<String, RecommendationError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecommendationError::Timeout
                } else if e.is_connect() {
                    RecommendationError::Unavailable
                } else {
                    RecommendationError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RecommendationError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RecommendationError::Timeout
            } else {
                RecommendationError::Request(e)
            }
        })?;

        let parsed: RecommendationResponse = serde_json::from_str(&body)
            .map_err(|e| RecommendationError::MalformedResponse(e.to_string()))?;

        Ok(parsed.recommendations)
    }
}

/// Errors that can occur when requesting recommendations
#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Recommendation service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    fn observed() -> ObservationState {
        ObservationState {
            latitude: Some(34.05),
            longitude: Some(-118.24),
            severity: 5,
            weather: Some("Dry, windy".to_string()),
            active_fire_count: Some(3),
            ..Default::default()
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/generateRecommendations", addr)
    }

    fn client_for(endpoint: String) -> HttpRecommendationClient {
        HttpRecommendationClient::new(RecommendationConfig {
            endpoint,
            request_timeout_ms: 5_000,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = RecommendationConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_request_requires_location_and_weather() {
        assert!(RecommendationRequest::from_state(&observed()).is_some());

        let mut state = observed();
        state.weather = None;
        assert!(RecommendationRequest::from_state(&state).is_none());

        let mut state = observed();
        state.longitude = None;
        assert!(RecommendationRequest::from_state(&state).is_none());
    }

    #[test]
    fn test_request_wire_keys() {
        let mut state = observed();
        state.active_fire_count = None;
        state.temperature = Some(98.0);

        let request = RecommendationRequest::from_state(&state).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["lat"], 34.05);
        assert_eq!(json["lng"], -118.24);
        assert_eq!(json["severity"], 5);
        assert_eq!(json["weather"], "Dry, windy");
        assert_eq!(json["Temp"], 98.0);
        assert!(json["Wind"].is_null());
        assert!(json["Humidity"].is_null());
        assert!(json["population"].is_null());
        assert_eq!(json["totalFires"], 0);
        assert!(json["region"].is_null());
    }

    #[tokio::test]
    async fn test_success_returns_text() {
        let router = Router::new().route(
            "/generateRecommendations",
            post(|Json(req): Json<RecommendationRequest>| async move {
                Json(serde_json::json!({
                    "recommendations": format!("• Fires nearby: {}", req.total_fires)
                }))
            }),
        );
        let client = client_for(serve(router).await);

        let request = RecommendationRequest::from_state(&observed()).unwrap();
        let text = client.generate(&request).await.unwrap();

        assert_eq!(text, "• Fires nearby: 3");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let router = Router::new().route(
            "/generateRecommendations",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
        );
        let client = client_for(serve(router).await);

        let request = RecommendationRequest::from_state(&observed()).unwrap();
        let err = client.generate(&request).await.unwrap_err();

        match err {
            RecommendationError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let router = Router::new().route(
            "/generateRecommendations",
            post(|| async { Json(serde_json::json!({ "advice": "Stay inside" })) }),
        );
        let client = client_for(serve(router).await);

        let request = RecommendationRequest::from_state(&observed()).unwrap();
        let err = client.generate(&request).await.unwrap_err();

        assert!(matches!(err, RecommendationError::MalformedResponse(_)));
    }
}
