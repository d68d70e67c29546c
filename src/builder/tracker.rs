//! Builder for constructing history trackers.

use crate::builder::error::BuildError;
use crate::core::{Action, Clock, Differ, JsonPatchDiffer, SystemClock, Tracked};
use crate::tracking::{HistoryTracker, TransitionFn};
use std::convert::Infallible;
use std::sync::Arc;

/// Builder for [`HistoryTracker`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use state_trail::builder::TrackerBuilder;
/// use state_trail::core::{Action, FixedClock, JsonState, Tracked};
/// use serde_json::json;
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// let tracker = TrackerBuilder::<JsonState, Infallible>::new()
///     .initial(JsonState::default())
///     .reducer(|state: &Arc<JsonState>, action: &Action| {
///         Arc::new(state.set("last", json!(action.kind)))
///     })
///     .clock(FixedClock(0))
///     .build()
///     .unwrap();
///
/// let state = tracker.apply(None, &Action::new("PING")).unwrap();
/// assert_eq!(state.history().timestamps(), [0]);
/// ```
pub struct TrackerBuilder<S: Tracked + 'static, E> {
    transition: Option<TransitionFn<S, E>>,
    initial: Option<Arc<S>>,
    differ: Arc<dyn Differ>,
    clock: Arc<dyn Clock>,
}

impl<S: Tracked + 'static, E: std::error::Error + 'static> TrackerBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transition: None,
            initial: None,
            differ: Arc::new(JsonPatchDiffer),
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the fallible transition function (required).
    pub fn transition<F>(mut self, transition: F) -> Self
    where
        F: Fn(&Arc<S>, &Action) -> Result<Arc<S>, E> + Send + Sync + 'static,
    {
        self.transition = Some(Arc::new(transition));
        self
    }

    /// Set the state used when no state is supplied (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(Arc::new(state));
        self
    }

    /// Same as [`initial`](Self::initial) for an already shared state.
    pub fn initial_shared(mut self, state: Arc<S>) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn differ<D: Differ + 'static>(mut self, differ: D) -> Self {
        self.differ = Arc::new(differ);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Build the tracker.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<HistoryTracker<S, E>, BuildError> {
        let transition = self.transition.ok_or(BuildError::MissingTransition)?;
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        Ok(HistoryTracker::from_parts(
            transition,
            initial,
            self.differ,
            self.clock,
        ))
    }
}

impl<S: Tracked + 'static> TrackerBuilder<S, Infallible> {
    /// Set a transition function that cannot fail (alternative to `transition`).
    pub fn reducer<F>(self, reducer: F) -> Self
    where
        F: Fn(&Arc<S>, &Action) -> Arc<S> + Send + Sync + 'static,
    {
        self.transition(move |state: &Arc<S>, action: &Action| Ok(reducer(state, action)))
    }
}

impl<S: Tracked + 'static, E: std::error::Error + 'static> Default for TrackerBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
