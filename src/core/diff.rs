//! Structural difference between two state trees.
//!
//! The tracker never interprets a [`Delta`]; it only asks a [`Differ`] for one
//! and stores whatever comes back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Opaque structural difference produced by a [`Differ`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delta(Value);

impl Delta {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Errors raised while diffing two states.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The state could not be turned into a JSON mapping
    #[error("State serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The differ refused its input
    #[error("Unsupported diff input: {0}")]
    Unsupported(String),
}

/// Computes the difference between two JSON mappings.
///
/// `Ok(None)` means the two values are structurally identical.
pub trait Differ: Send + Sync {
    fn diff(&self, a: &Value, b: &Value) -> Result<Option<Delta>, DiffError>;
}

impl<F> Differ for F
where
    F: Fn(&Value, &Value) -> Result<Option<Delta>, DiffError> + Send + Sync,
{
    fn diff(&self, a: &Value, b: &Value) -> Result<Option<Delta>, DiffError> {
        self(a, b)
    }
}

/// Default differ: an RFC 6902 JSON Patch that turns `a` into `b`.
///
/// # Example
///
/// ```rust
/// use state_trail::core::{Differ, JsonPatchDiffer};
/// use serde_json::json;
///
/// let differ = JsonPatchDiffer;
/// assert!(differ.diff(&json!({"a": 1}), &json!({"a": 1})).unwrap().is_none());
///
/// let delta = differ.diff(&json!({"a": 2}), &json!({"a": 1})).unwrap().unwrap();
/// assert_eq!(delta.as_value()[0]["op"], "replace");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonPatchDiffer;

impl Differ for JsonPatchDiffer {
    fn diff(&self, a: &Value, b: &Value) -> Result<Option<Delta>, DiffError> {
        let patch = json_patch::diff(a, b);
        if patch.0.is_empty() {
            return Ok(None);
        }
        Ok(Some(Delta::new(serde_json::to_value(&patch)?)))
    }
}
