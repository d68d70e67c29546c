//! Tracking error types.

use crate::core::DiffError;
use thiserror::Error;

/// Failure of a tracked transition.
///
/// The tracker raises nothing of its own: both variants carry the
/// collaborator's error unchanged.
#[derive(Debug, Error)]
pub enum TrackError<E>
where
    E: std::error::Error + 'static,
{
    /// The wrapped transition function failed
    #[error(transparent)]
    Transition(E),

    /// Diffing the two states failed
    #[error(transparent)]
    Diff(#[from] DiffError),
}
