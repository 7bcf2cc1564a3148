//! Store actions and the reducer
//!
//! Actions travel as `{"type": "SET_CURRENT_LATITUDE", "payload": 34.05}`,
//! the same shape the dashboard components dispatch. An unrecognized `type`
//! decodes to [`Action::Unknown`] so callers never fail on it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::observation::ObservationState;

/// The closed set of state transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum Action {
    SetLongitude(f64),
    SetLatitude(f64),
    SetSeverity(i64),
    SetPopulation(f64),
    SetTotalActiveFires(u64),
    SetSelectedRegion(String),
    SetWeather(String),
    SetWindSpeed(f64),
    SetHumidity(f64),
    SetTemperature(f64),
    SetRecommendations(Vec<String>),
    SetRecommendationsLoading(bool),
    SetRecommendationsError(String),
    ResetRecommendations,
    ResetAll,
    /// Any action type this store does not know; applying it changes nothing
    Unknown(String),
}

impl Action {
    /// Wire name of the action
    pub fn name(&self) -> &str {
        match self {
            Action::SetLongitude(_) => "SET_CURRENT_LONGITUDE",
            Action::SetLatitude(_) => "SET_CURRENT_LATITUDE",
            Action::SetSeverity(_) => "SET_CURRENT_SEVERITY",
            Action::SetPopulation(_) => "SET_CURRENT_POPULATION",
            Action::SetTotalActiveFires(_) => "SET_TOTAL_ACTIVE_FIRES",
            Action::SetSelectedRegion(_) => "SET_SELECTED_REGION",
            Action::SetWeather(_) => "SET_CURRENT_WEATHER",
            Action::SetWindSpeed(_) => "SET_CURRENT_WIND_SPEED",
            Action::SetHumidity(_) => "SET_CURRENT_HUMIDITY",
            Action::SetTemperature(_) => "SET_CURRENT_TEMPERATURE",
            Action::SetRecommendations(_) => "SET_RECOMMENDATIONS",
            Action::SetRecommendationsLoading(_) => "SET_RECOMMENDATIONS_LOADING",
            Action::SetRecommendationsError(_) => "SET_RECOMMENDATIONS_ERROR",
            Action::ResetRecommendations => "RESET_RECOMMENDATIONS",
            Action::ResetAll => "RESET_MAP_STATE",
            Action::Unknown(name) => name.as_str(),
        }
    }

    /// Whether applying this action can change state
    pub fn is_known(&self) -> bool {
        !matches!(self, Action::Unknown(_))
    }
}

/// Apply an action to a state, producing the next state
///
/// Every field the action does not target is carried over unchanged.
pub fn reduce(state: &ObservationState, action: Action) -> ObservationState {
    let mut next = state.clone();

    match action {
        Action::SetLongitude(v) => next.longitude = Some(v),
        Action::SetLatitude(v) => next.latitude = Some(v),
        Action::SetSeverity(v) => next.severity = v,
        Action::SetPopulation(v) => next.population = Some(v),
        Action::SetTotalActiveFires(v) => next.active_fire_count = Some(v),
        Action::SetSelectedRegion(v) => next.selected_region = Some(v),
        Action::SetWeather(v) => next.weather = Some(v),
        Action::SetWindSpeed(v) => next.wind_speed = Some(v),
        Action::SetHumidity(v) => next.humidity = Some(v),
        Action::SetTemperature(v) => next.temperature = Some(v),
        Action::SetRecommendations(v) => next.recommendations = v,
        Action::SetRecommendationsLoading(v) => next.recommendations_loading = v,
        Action::SetRecommendationsError(v) => next.recommendations_error = v,
        Action::ResetRecommendations => {
            next.recommendations = Vec::new();
            next.recommendations_loading = false;
            next.recommendations_error = String::new();
        }
        Action::ResetAll => next = ObservationState::default(),
        Action::Unknown(_) => {}
    }

    next
}

// ============================================
// Wire form
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

fn payload<T: serde::de::DeserializeOwned>(kind: &str, value: Option<Value>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} requires a payload", kind))?;
    serde_json::from_value(value).map_err(|e| format!("invalid payload for {}: {}", kind, e))
}

impl TryFrom<RawAction> for Action {
    type Error = String;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let RawAction { kind, payload: value } = raw;
        let action = match kind.as_str() {
            "SET_CURRENT_LONGITUDE" => Action::SetLongitude(payload(&kind, value)?),
            "SET_CURRENT_LATITUDE" => Action::SetLatitude(payload(&kind, value)?),
            "SET_CURRENT_SEVERITY" => Action::SetSeverity(payload(&kind, value)?),
            "SET_CURRENT_POPULATION" => Action::SetPopulation(payload(&kind, value)?),
            "SET_TOTAL_ACTIVE_FIRES" => Action::SetTotalActiveFires(payload(&kind, value)?),
            "SET_SELECTED_REGION" => Action::SetSelectedRegion(payload(&kind, value)?),
            "SET_CURRENT_WEATHER" => Action::SetWeather(payload(&kind, value)?),
            "SET_CURRENT_WIND_SPEED" => Action::SetWindSpeed(payload(&kind, value)?),
            "SET_CURRENT_HUMIDITY" => Action::SetHumidity(payload(&kind, value)?),
            "SET_CURRENT_TEMPERATURE" => Action::SetTemperature(payload(&kind, value)?),
            "SET_RECOMMENDATIONS" => Action::SetRecommendations(payload(&kind, value)?),
            "SET_RECOMMENDATIONS_LOADING" => Action::SetRecommendationsLoading(payload(&kind, value)?),
            "SET_RECOMMENDATIONS_ERROR" => Action::SetRecommendationsError(payload(&kind, value)?),
            "RESET_RECOMMENDATIONS" => Action::ResetRecommendations,
            "RESET_MAP_STATE" => Action::ResetAll,
            _ => Action::Unknown(kind.clone()),
        };
        Ok(action)
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        let kind = action.name().to_string();
        let payload = match action {
            Action::SetLongitude(v)
            | Action::SetLatitude(v)
            | Action::SetPopulation(v)
            | Action::SetWindSpeed(v)
            | Action::SetHumidity(v)
            | Action::SetTemperature(v) => Some(Value::from(v)),
            Action::SetSeverity(v) => Some(Value::from(v)),
            Action::SetTotalActiveFires(v) => Some(Value::from(v)),
            Action::SetSelectedRegion(v)
            | Action::SetWeather(v)
            | Action::SetRecommendationsError(v) => Some(Value::from(v)),
            Action::SetRecommendations(v) => Some(Value::from(v)),
            Action::SetRecommendationsLoading(v) => Some(Value::from(v)),
            Action::ResetRecommendations | Action::ResetAll | Action::Unknown(_) => None,
        };
        RawAction { kind, payload }
    }
}
