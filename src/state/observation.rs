//! Observation state record
//!
//! The single record of "current observed conditions" plus the derived
//! recommendation state. Serialized field names match the snapshot keys the
//! dashboard has always written, so existing snapshots keep loading.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Current observed conditions and recommendation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationState {
    #[serde(rename = "currentLongitude")]
    pub longitude: Option<f64>,

    #[serde(rename = "currentLatitude")]
    pub latitude: Option<f64>,

    #[serde(rename = "currentSeverity", deserialize_with = "null_as_zero")]
    pub severity: i64,

    #[serde(rename = "currentPopulation")]
    pub population: Option<f64>,

    #[serde(rename = "currentWeather")]
    pub weather: Option<String>,

    #[serde(rename = "totalactiveFires")]
    pub active_fire_count: Option<u64>,

    #[serde(rename = "selectedRegion")]
    pub selected_region: Option<String>,

    #[serde(rename = "currentWindSpeed")]
    pub wind_speed: Option<f64>,

    #[serde(rename = "currentHumidity")]
    pub humidity: Option<f64>,

    #[serde(rename = "currentTemperature")]
    pub temperature: Option<f64>,

    pub recommendations: Vec<String>,

    #[serde(rename = "recommendationsLoading")]
    pub recommendations_loading: bool,

    #[serde(rename = "recommendationsError")]
    pub recommendations_error: String,
}

impl Default for ObservationState {
    fn default() -> Self {
        Self {
            longitude: None,
            latitude: None,
            severity: 0,
            population: None,
            weather: None,
            active_fire_count: None,
            selected_region: None,
            wind_speed: None,
            humidity: None,
            temperature: None,
            recommendations: Vec::new(),
            recommendations_loading: false,
            recommendations_error: String::new(),
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

impl ObservationState {
    /// Parse a snapshot produced by [`ObservationState::to_snapshot`]
    ///
    /// Only a JSON object is a snapshot; arrays and scalars are rejected.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<serde_json::Value>(snapshot)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Err(serde_json::Error::custom("snapshot is not a JSON object")),
        }
    }

    /// Serialize the full state for the snapshot slot
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether the fields a recommendation needs are all present
    ///
    /// Severity is always present (it defaults to 0), so this comes down to
    /// coordinates and a weather description.
    pub fn has_required_fields(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some() && self.weather.is_some()
    }

    /// The subset of fields the recommendation fetcher reacts to
    pub fn watched(&self) -> WatchedFields {
        WatchedFields {
            latitude: self.latitude,
            longitude: self.longitude,
            severity: self.severity,
            weather: self.weather.clone(),
            wind_speed: self.wind_speed,
            humidity: self.humidity,
            temperature: self.temperature,
            active_fire_count: self.active_fire_count,
            selected_region: self.selected_region.clone(),
            population: self.population,
        }
    }
}

/// Fields whose change re-triggers a recommendation cycle
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub severity: i64,
    pub weather: Option<String>,
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
    pub active_fire_count: Option<u64>,
    pub selected_region: Option<String>,
    pub population: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> ObservationState {
        ObservationState {
            longitude: Some(-118.24),
            latitude: Some(34.05),
            severity: 5,
            population: Some(3_900_000.0),
            weather: Some("Dry, windy".to_string()),
            active_fire_count: Some(3),
            selected_region: Some("CA".to_string()),
            wind_speed: Some(25.0),
            humidity: Some(12.0),
            temperature: Some(96.0),
            recommendations: vec!["• Monitor local alerts".to_string()],
            recommendations_loading: false,
            recommendations_error: String::new(),
        }
    }

    #[test]
    fn test_default_state() {
        let state = ObservationState::default();
        assert!(state.latitude.is_none());
        assert!(state.longitude.is_none());
        assert_eq!(state.severity, 0);
        assert!(state.weather.is_none());
        assert!(state.recommendations.is_empty());
        assert!(!state.recommendations_loading);
        assert!(state.recommendations_error.is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let state = populated();
        let snapshot = state.to_snapshot().unwrap();
        assert_eq!(ObservationState::from_snapshot(&snapshot).unwrap(), state);
    }

    #[test]
    fn test_snapshot_uses_dashboard_keys() {
        let snapshot = populated().to_snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();

        assert_eq!(value["currentLatitude"], 34.05);
        assert_eq!(value["totalactiveFires"], 3);
        assert_eq!(value["recommendationsLoading"], false);
        assert!(value.get("latitude").is_none());
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let state =
            ObservationState::from_snapshot(r#"{"currentLatitude": 61.2, "currentSeverity": null}"#)
                .unwrap();

        assert_eq!(state.latitude, Some(61.2));
        assert_eq!(state.severity, 0);
        assert!(state.longitude.is_none());
        assert!(state.recommendations.is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        assert!(ObservationState::from_snapshot("not json").is_err());
        assert!(ObservationState::from_snapshot("[1, 2, 3]").is_err());
        assert!(ObservationState::from_snapshot(r#"{"currentLatitude": "north"}"#).is_err());
    }

    #[test]
    fn test_required_fields() {
        let mut state = populated();
        assert!(state.has_required_fields());

        state.weather = None;
        assert!(!state.has_required_fields());

        let mut state = populated();
        state.latitude = None;
        assert!(!state.has_required_fields());
    }

    #[test]
    fn test_watched_fields_ignore_recommendation_state() {
        let before = populated();
        let mut after = before.clone();
        after.recommendations_loading = true;
        after.recommendations.clear();
        after.recommendations_error = "boom".to_string();
        assert_eq!(before.watched(), after.watched());

        after.humidity = Some(40.0);
        assert_ne!(before.watched(), after.watched());
    }
}
