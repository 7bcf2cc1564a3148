//! Observation State
//!
//! The shared state of the dashboard and the only way to change it:
//!
//! - **observation**: The `ObservationState` record and its snapshot form
//! - **action**: The closed set of `Action`s and the pure `reduce` function
//! - **store**: `ObservationStore`, which applies actions, notifies
//!   subscribers, and commits every transition to the snapshot slot
//!
//! # Flow
//!
//! ```text
//! dispatch(action) → reduce → publish to subscribers → commit snapshot
//! ```

pub mod action;
pub mod observation;
pub mod store;

pub use action::{reduce, Action};
pub use observation::{ObservationState, WatchedFields};
pub use store::{load_initial_state, ObservationStore, StoreStats};
