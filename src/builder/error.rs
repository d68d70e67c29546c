//! Build errors for tracker builders.

use thiserror::Error;

/// Errors that can occur when building a history tracker.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition function not specified. Call .transition(f) or .reducer(f) first")]
    MissingTransition,

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,
}
