//! State Trail: append-only delta history for unidirectional state containers
//!
//! State Trail wraps a pure transition function `(state, action) -> state`
//! and, for every transition that changes something, appends a structural
//! delta to a history log that lives inside the state tree itself. Old
//! snapshots are never touched, so any previously returned state still
//! describes exactly the history it had when it was produced.
//!
//! # Core Concepts
//!
//! - **Tracked state**: any state exposing its `HistoryLog` via the `Tracked` trait
//! - **Tracker**: the wrapper deciding, per action, whether to record a delta
//! - **Store adapter**: installs the tracker in front of a state container
//! - **Checkpoints**: persist a state with its history for later hydration
//!
//! # Example
//!
//! ```rust
//! use state_trail::core::{Action, JsonState, Tracked};
//! use state_trail::store::{install, BasicStoreFactory};
//! use serde_json::json;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! fn counter(state: &Arc<JsonState>, action: &Action) -> Result<Arc<JsonState>, Infallible> {
//!     let n = state.get("counter").and_then(|v| v.as_i64()).unwrap_or(0);
//!     Ok(match action.kind.as_str() {
//!         "INC" => Arc::new(state.set("counter", json!(n + 1))),
//!         "DEBUG_SET" => Arc::new(state.set("counter", action.payload.clone())),
//!         _ => Arc::clone(state),
//!     })
//! }
//!
//! let initial = Arc::new(JsonState::default().set("counter", json!(0)));
//! let mut store = install(None)
//!     .enhance(BasicStoreFactory)
//!     .create(counter, Some(initial))
//!     .unwrap();
//!
//! store.dispatch(&Action::new("INC")).unwrap();
//! store
//!     .dispatch(&Action::new("DEBUG_SET").with_payload(json!(99)).untracked())
//!     .unwrap();
//!
//! let state = store.state();
//! assert_eq!(state.get("counter"), Some(&json!(99)));
//! assert_eq!(state.history().cursor(), 0);
//! assert_eq!(state.history().labels(), ["INC".to_string()]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod store;
pub mod tracking;

// Re-export commonly used types
pub use crate::core::{Action, Delta, HistoryLog, JsonState, Tracked};
pub use store::{install, Store};
pub use tracking::{HistoryTracker, TrackError};

#[doc(hidden)]
pub use serde_json as __serde_json;
