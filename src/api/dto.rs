//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommend::{PanelReport, PanelState};
use crate::state::Action;

// ============================================
// ACTION DTOs
// ============================================

/// Body of `POST /api/v1/actions`: one action or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActionBatch {
    Many(Vec<Action>),
    One(Action),
}

impl ActionBatch {
    pub fn into_actions(self) -> Vec<Action> {
        match self {
            ActionBatch::Many(actions) => actions,
            ActionBatch::One(action) => vec![action],
        }
    }
}

// ============================================
// OBSERVATION DTOs
// ============================================

/// Partial observation update; every present field becomes a set-action
#[derive(Debug, Default, Deserialize)]
pub struct ObservationUpdate {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub severity: Option<i64>,
    #[serde(default)]
    pub population: Option<f64>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub active_fire_count: Option<u64>,
    #[serde(default)]
    pub selected_region: Option<String>,
}

impl ObservationUpdate {
    /// Check coordinate ranges
    pub fn validate(&self) -> Result<(), String> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("latitude {} is outside [-90, 90]", lat));
            }
        }
        if let Some(lng) = self.longitude {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(format!("longitude {} is outside [-180, 180]", lng));
            }
        }
        Ok(())
    }

    /// Translate into set-actions, longitude first like the map components
    pub fn into_actions(self) -> Vec<Action> {
        let mut actions = Vec::new();

        if let Some(v) = self.longitude {
            actions.push(Action::SetLongitude(v));
        }
        if let Some(v) = self.latitude {
            actions.push(Action::SetLatitude(v));
        }
        if let Some(v) = self.severity {
            actions.push(Action::SetSeverity(v));
        }
        if let Some(v) = self.population {
            actions.push(Action::SetPopulation(v));
        }
        if let Some(v) = self.active_fire_count {
            actions.push(Action::SetTotalActiveFires(v));
        }
        if let Some(v) = self.selected_region {
            actions.push(Action::SetSelectedRegion(v));
        }
        if let Some(v) = self.weather {
            actions.push(Action::SetWeather(v));
        }
        if let Some(v) = self.wind_speed {
            actions.push(Action::SetWindSpeed(v));
        }
        if let Some(v) = self.humidity {
            actions.push(Action::SetHumidity(v));
        }
        if let Some(v) = self.temperature {
            actions.push(Action::SetTemperature(v));
        }

        actions
    }
}

// ============================================
// RECOMMENDATION DTOs
// ============================================

/// Response of `GET /api/v1/recommendations`
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    /// What the panel displays for the stored state
    pub panel: PanelReport,
    /// Whether the background fetcher is running
    pub fetcher_enabled: bool,
    /// Fetcher's own panel state, if running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetcher: Option<PanelState>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Snapshot storage status
    pub storage: String,
    /// Recommendation fetcher status: running, disabled
    pub recommendations: String,
    /// Actions applied since startup
    pub actions_applied: u64,
    /// Failed snapshot writes since startup
    pub failed_commits: u64,
    /// Time of the last successful snapshot write
    pub last_commit: Option<DateTime<Utc>>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
