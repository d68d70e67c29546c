//! Checkpoint error types.

use crate::core::HistoryViolation;
use thiserror::Error;

/// Why a checkpoint could not be written or loaded.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Could not encode checkpoint: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Could not decode checkpoint: {0}")]
    Decode(#[source] serde_json::Error),

    /// Written by a newer or older format
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The stored history log breaks its invariants
    #[error("Checkpoint history is inconsistent: {}", describe(.0))]
    InconsistentHistory(Vec<HistoryViolation>),
}

fn describe(violations: &[HistoryViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
