//! State trees that carry their own history.
//!
//! Any state handled by the tracker implements [`Tracked`]: it exposes the
//! [`HistoryLog`] stored under [`HISTORY_KEY`] and can produce a copy of
//! itself with that log replaced.

use super::diff::DiffError;
use super::history::HistoryLog;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Name of the state field holding the [`HistoryLog`].
pub const HISTORY_KEY: &str = "stateHistory";

/// A state tree with an embedded [`HistoryLog`].
///
/// Implementations must serialize to a JSON object whose history lives under
/// [`HISTORY_KEY`]; [`content`](Tracked::content) relies on that to exclude
/// the log from diffs. The [`tracked_state!`](crate::tracked_state) macro
/// generates a conforming implementation.
pub trait Tracked: Serialize + Send + Sync {
    fn history(&self) -> &HistoryLog;

    /// Copy of this state with `history` in place of the current log.
    fn with_history(&self, history: HistoryLog) -> Self
    where
        Self: Sized;

    /// This state as JSON, without its history field.
    fn content(&self) -> Result<Value, DiffError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove(HISTORY_KEY);
        }
        Ok(value)
    }
}

/// Untyped state: a JSON mapping plus its history.
///
/// Fields sit behind an `Arc`, so cloning a `JsonState` (or swapping its
/// history) never copies the mapping. Setters return a new state.
///
/// # Example
///
/// ```rust
/// use state_trail::core::{JsonState, Tracked};
/// use serde_json::json;
///
/// let state = JsonState::default().set("counter", json!(0));
/// let next = state.set("counter", json!(1));
///
/// assert_eq!(state.get("counter"), Some(&json!(0)));
/// assert_eq!(next.get("counter"), Some(&json!(1)));
/// assert_eq!(next.content().unwrap(), json!({"counter": 1}));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonState {
    #[serde(rename = "stateHistory", default)]
    history: HistoryLog,

    #[serde(flatten)]
    fields: Arc<Map<String, Value>>,
}

impl JsonState {
    /// Build a state from `fields` with an empty history.
    ///
    /// A `stateHistory` key in `fields` is dropped.
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(HISTORY_KEY);
        Self {
            history: HistoryLog::new(),
            fields: Arc::new(fields),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// New state with `key` set to `value`. The history key is not settable.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key == HISTORY_KEY {
            return self.clone();
        }
        let mut fields = Map::clone(&self.fields);
        fields.insert(key, value);
        Self {
            history: self.history.clone(),
            fields: Arc::new(fields),
        }
    }

    pub fn remove(&self, key: &str) -> Self {
        let mut fields = Map::clone(&self.fields);
        fields.remove(key);
        Self {
            history: self.history.clone(),
            fields: Arc::new(fields),
        }
    }
}

impl Tracked for JsonState {
    fn history(&self) -> &HistoryLog {
        &self.history
    }

    fn with_history(&self, history: HistoryLog) -> Self {
        Self {
            history,
            fields: Arc::clone(&self.fields),
        }
    }

    fn content(&self) -> Result<Value, DiffError> {
        Ok(Value::Object(Map::clone(&self.fields)))
    }
}
