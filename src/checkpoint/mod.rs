//! Checkpoint and hydration of tracked state.
//!
//! A checkpoint captures a full state snapshot, history included, so a later
//! process can hand it to [`install`](crate::store::install) and keep
//! appending to the same log.

use crate::core::Tracked;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::debug;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a tracked state.
///
/// # Example
///
/// ```rust
/// use state_trail::checkpoint::Checkpoint;
/// use state_trail::core::{Delta, JsonState, Tracked};
/// use serde_json::json;
///
/// let state = JsonState::default().set("counter", json!(3));
/// let state = state.with_history(state.history().record(Delta::new(json!([])), 1, "INC"));
///
/// let json = Checkpoint::capture(&state).to_json().unwrap();
/// let restored = Checkpoint::<JsonState>::from_json(&json).unwrap().into_state();
///
/// assert_eq!(restored.history().labels(), ["INC".to_string()]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Captured state, history included
    pub state: S,
}

impl<S> Checkpoint<S>
where
    S: Tracked + Clone + DeserializeOwned,
{
    /// Capture a copy of `state`.
    pub fn capture(state: &S) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(CheckpointError::Encode)
    }

    pub fn to_json_pretty(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(CheckpointError::Encode)
    }

    /// Parse a checkpoint and check its version and history invariants.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(CheckpointError::Decode)?;
        checkpoint.validate()?;
        debug!(
            id = %checkpoint.id,
            entries = checkpoint.state.history().len(),
            "checkpoint loaded"
        );
        Ok(checkpoint)
    }

    /// Reject unsupported versions and broken history logs.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        match self.state.history().validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(violations) => {
                Err(CheckpointError::InconsistentHistory(violations.into_vec()))
            }
        }
    }

    /// The captured state, ready to seed a store.
    pub fn into_state(self) -> Arc<S> {
        Arc::new(self.state)
    }
}
