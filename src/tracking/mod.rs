//! History-tracking transition wrapper.
//!
//! [`HistoryTracker`] sits between a state container and the application's
//! transition function. For every action it runs the transition and then
//! decides whether the result deserves a history entry:
//!
//! - the transition returned the very same `Arc` → nothing changed, skip
//! - the action's `meta` is `"SKIP_HISTORY_TRACKING"` → opted out, skip
//! - the differ finds no structural difference → skip
//! - otherwise → append the delta, a timestamp and the action type
//!
//! # Example
//!
//! ```rust
//! use state_trail::core::{Action, JsonState, Tracked};
//! use state_trail::tracking::HistoryTracker;
//! use serde_json::json;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! let tracker = HistoryTracker::new(
//!     |state: &Arc<JsonState>, action: &Action| -> Result<Arc<JsonState>, Infallible> {
//!         match action.kind.as_str() {
//!             "INC" => {
//!                 let n = state.get("counter").and_then(|v| v.as_i64()).unwrap_or(0);
//!                 Ok(Arc::new(state.set("counter", json!(n + 1))))
//!             }
//!             _ => Ok(Arc::clone(state)),
//!         }
//!     },
//!     Arc::new(JsonState::default().set("counter", json!(0))),
//! );
//!
//! let state = tracker.apply(None, &Action::new("INC")).unwrap();
//! assert_eq!(state.history().cursor(), 0);
//! assert_eq!(state.history().labels(), ["INC".to_string()]);
//! ```

mod error;
mod tracker;

pub use error::TrackError;
pub use tracker::{HistoryTracker, SkipReason, TransitionFn};
