//! Builder API for ergonomic tracker construction.
//!
//! This module provides a fluent builder and a macro for wiring history
//! tracking with minimal boilerplate while keeping state types concrete.

pub mod error;
pub mod macros;
pub mod tracker;

pub use error::BuildError;
pub use tracker::TrackerBuilder;

use crate::core::{Action, Tracked};
use crate::tracking::HistoryTracker;
use std::convert::Infallible;
use std::sync::Arc;

/// Wrap an infallible reducer with the default differ and clock.
///
/// # Example
///
/// ```
/// use state_trail::builder::track;
/// use state_trail::core::{Action, JsonState, Tracked};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let tracker = track(
///     |state: &Arc<JsonState>, action: &Action| Arc::new(state.set("seen", json!(action.kind))),
///     JsonState::default(),
/// );
///
/// let state = tracker.apply(None, &Action::new("HELLO")).unwrap();
/// assert_eq!(state.history().labels(), ["HELLO".to_string()]);
/// ```
pub fn track<S, F>(reducer: F, initial: S) -> HistoryTracker<S, Infallible>
where
    S: Tracked + 'static,
    F: Fn(&Arc<S>, &Action) -> Arc<S> + Send + Sync + 'static,
{
    HistoryTracker::new(
        move |state: &Arc<S>, action: &Action| Ok(reducer(state, action)),
        Arc::new(initial),
    )
}
