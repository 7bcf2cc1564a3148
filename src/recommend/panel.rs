//! Panel View
//!
//! What the safety-recommendation panel shows for a given state, in a form
//! the CLI can print and the API can return.

use serde::Serialize;
use std::fmt;

use crate::state::ObservationState;

/// Main body of the recommendation panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelView {
    Loading,
    Error { message: String },
    Placeholder,
    Recommendations { items: Vec<String> },
}

impl PanelView {
    /// Derive the panel body from the store state
    pub fn from_state(state: &ObservationState) -> Self {
        if state.recommendations_loading {
            return PanelView::Loading;
        }
        if !state.recommendations_error.is_empty() {
            return PanelView::Error {
                message: state.recommendations_error.clone(),
            };
        }
        if !state.has_required_fields()
            || state.active_fire_count == Some(0)
            || state.recommendations.is_empty()
        {
            return PanelView::Placeholder;
        }

        PanelView::Recommendations {
            items: state
                .recommendations
                .iter()
                .map(|r| plain_text(r))
                .collect(),
        }
    }
}

/// Strip `**bold**` markup and a leading `*` bullet for plain-text display
pub fn plain_text(recommendation: &str) -> String {
    let without_bold = recommendation.replace("**", "");
    let trimmed = without_bold.trim_start();
    trimmed
        .strip_prefix('*')
        .map(str::trim_start)
        .unwrap_or(trimmed)
        .to_string()
}

/// Weather block of the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub conditions: String,
    pub temperature: String,
    pub wind_speed: String,
    pub humidity: String,
}

/// Full panel: body plus location and weather details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelReport {
    pub view: PanelView,
    pub latitude: String,
    pub longitude: String,
    pub severity: String,
    pub active_fires: String,
    pub weather: Option<WeatherSummary>,
}

impl PanelReport {
    pub fn from_state(state: &ObservationState) -> Self {
        let coord = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), |v| format!("{:.4}", v));
        let metric = |v: Option<f64>, unit: &str| {
            v.map_or_else(|| "N/A".to_string(), |v| format!("{}{}", v, unit))
        };

        Self {
            view: PanelView::from_state(state),
            latitude: coord(state.latitude),
            longitude: coord(state.longitude),
            severity: if state.severity == 0 {
                "Unknown".to_string()
            } else {
                state.severity.to_string()
            },
            active_fires: state.active_fire_count.unwrap_or(0).to_string(),
            weather: state.weather.as_ref().map(|conditions| WeatherSummary {
                conditions: conditions.clone(),
                temperature: metric(state.temperature, "°F"),
                wind_speed: metric(state.wind_speed, " mph"),
                humidity: metric(state.humidity, "%"),
            }),
        }
    }
}

impl fmt::Display for PanelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI Safety Recommendations")?;
        match &self.view {
            PanelView::Loading => writeln!(f, "  Generating smart suggestions...")?,
            PanelView::Error { message } => writeln!(f, "  {}", message)?,
            PanelView::Placeholder => writeln!(
                f,
                "  No recommendations available. Select a location with active fire data."
            )?,
            PanelView::Recommendations { items } => {
                for item in items {
                    writeln!(f, "  | {}", item)?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Location Data")?;
        writeln!(f, "  Latitude:      {}", self.latitude)?;
        writeln!(f, "  Longitude:     {}", self.longitude)?;
        writeln!(f, "  Fire Severity: {}", self.severity)?;
        writeln!(f, "  Active Fires:  {}", self.active_fires)?;

        writeln!(f)?;
        writeln!(f, "Weather Conditions")?;
        match &self.weather {
            Some(w) => {
                writeln!(f, "  Temperature:   {}", w.temperature)?;
                writeln!(f, "  Wind Speed:    {}", w.wind_speed)?;
                writeln!(f, "  Humidity:      {}", w.humidity)?;
                writeln!(f, "  Conditions:    {}", w.conditions)?;
            }
            None => writeln!(f, "  No weather data available")?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> ObservationState {
        ObservationState {
            latitude: Some(34.05),
            longitude: Some(-118.24),
            severity: 5,
            weather: Some("Dry, windy".to_string()),
            active_fire_count: Some(3),
            temperature: Some(96.0),
            recommendations: vec!["* **Evacuate** now".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_view_precedence() {
        let mut state = ready();
        state.recommendations_loading = true;
        state.recommendations_error = "x".to_string();
        assert_eq!(PanelView::from_state(&state), PanelView::Loading);

        state.recommendations_loading = false;
        assert_eq!(
            PanelView::from_state(&state),
            PanelView::Error {
                message: "x".to_string()
            }
        );

        state.recommendations_error.clear();
        assert_eq!(
            PanelView::from_state(&state),
            PanelView::Recommendations {
                items: vec!["Evacuate now".to_string()]
            }
        );
    }

    #[test]
    fn test_placeholder_cases() {
        let mut state = ready();
        state.active_fire_count = Some(0);
        assert_eq!(PanelView::from_state(&state), PanelView::Placeholder);

        let mut state = ready();
        state.weather = None;
        assert_eq!(PanelView::from_state(&state), PanelView::Placeholder);

        let mut state = ready();
        state.recommendations.clear();
        assert_eq!(PanelView::from_state(&state), PanelView::Placeholder);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("• Monitor alerts"), "• Monitor alerts");
        assert_eq!(plain_text("  * Pack **water**"), "Pack water");
        assert_eq!(plain_text("- Leave early"), "- Leave early");
    }

    #[test]
    fn test_report_fields() {
        let report = PanelReport::from_state(&ready());
        assert_eq!(report.latitude, "34.0500");
        assert_eq!(report.longitude, "-118.2400");
        assert_eq!(report.severity, "5");
        assert_eq!(report.active_fires, "3");

        let weather = report.weather.unwrap();
        assert_eq!(weather.temperature, "96°F");
        assert_eq!(weather.wind_speed, "N/A");

        let empty = PanelReport::from_state(&ObservationState::default());
        assert_eq!(empty.latitude, "N/A");
        assert_eq!(empty.severity, "Unknown");
        assert_eq!(empty.active_fires, "0");
        assert!(empty.weather.is_none());
        assert!(empty.to_string().contains("No weather data available"));
    }

    #[test]
    fn test_view_serializes_with_status_tag() {
        let json = serde_json::to_value(PanelView::Placeholder).unwrap();
        assert_eq!(json["status"], "placeholder");

        let json = serde_json::to_value(PanelView::Error {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
    }
}
