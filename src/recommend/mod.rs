//! Safety Recommendations
//!
//! Derives AI-generated safety advice from the current observation.
//!
//! ## Architecture
//!
//! - **Client**: `RecommendationSource` trait and its reqwest implementation
//! - **Parse**: Splits service text into bullet entries
//! - **Fetcher**: Watches the store and runs one cycle per watched-field change
//! - **Panel**: Plain-text / JSON view of what the panel displays
//!
//! ## Data Flow
//!
//! 1. A watched field changes in the `ObservationStore`
//! 2. The fetcher validates the observation and marks loading
//! 3. The source is called once with the full observation
//! 4. The parsed list (or the fixed error) is dispatched back into the store

mod client;
mod fetcher;
mod panel;
mod parse;

pub use client::{
    HttpRecommendationClient, RecommendationConfig, RecommendationError, RecommendationRequest,
    RecommendationSource, DEFAULT_ENDPOINT,
};
pub use fetcher::{CycleOutcome, PanelState, RecommendationFetcher, RECOMMENDATION_ERROR};
pub use panel::{plain_text, PanelReport, PanelView, WeatherSummary};
pub use parse::{split_recommendations, BULLET_MARKERS};
