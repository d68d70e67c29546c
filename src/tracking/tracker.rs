//! Transition wrapper that records each state change as a delta.

use crate::core::{Action, Clock, Differ, JsonPatchDiffer, SystemClock, Tracked};
use crate::store::Reducer;
use crate::tracking::error::TrackError;
use std::sync::Arc;
use tracing::{debug, trace};

/// Caller-supplied transition function.
pub type TransitionFn<S, E> = Arc<dyn Fn(&Arc<S>, &Action) -> Result<Arc<S>, E> + Send + Sync>;

/// Why a transition left the history untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The transition returned the state it was given
    Unchanged,
    /// The action asked not to be tracked
    OptedOut,
    /// The new state differs only by reference
    NoDifference,
}

/// Wraps a transition function and appends a history entry for every
/// transition that actually changes state.
pub struct HistoryTracker<S: Tracked + 'static, E> {
    transition: TransitionFn<S, E>,
    initial: Arc<S>,
    differ: Arc<dyn Differ>,
    clock: Arc<dyn Clock>,
}

impl<S, E> HistoryTracker<S, E>
where
    S: Tracked + 'static,
    E: std::error::Error + 'static,
{
    /// Wrap `transition`, using `initial` whenever no state is supplied.
    pub fn new<F>(transition: F, initial: Arc<S>) -> Self
    where
        F: Fn(&Arc<S>, &Action) -> Result<Arc<S>, E> + Send + Sync + 'static,
    {
        Self::from_parts(
            Arc::new(transition),
            initial,
            Arc::new(JsonPatchDiffer),
            Arc::new(SystemClock),
        )
    }

    pub(crate) fn from_parts(
        transition: TransitionFn<S, E>,
        initial: Arc<S>,
        differ: Arc<dyn Differ>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transition,
            initial,
            differ,
            clock,
        }
    }

    pub fn initial(&self) -> &Arc<S> {
        &self.initial
    }

    /// Run one transition, recording it when it changes state.
    ///
    /// The returned state is either exactly what the wrapped function
    /// produced or a copy of it with one more history entry. Errors from the
    /// transition function or the differ are returned as-is.
    pub fn apply(
        &self,
        state: Option<&Arc<S>>,
        action: &Action,
    ) -> Result<Arc<S>, TrackError<E>> {
        let state = state.unwrap_or(&self.initial);
        let next = (self.transition)(state, action).map_err(TrackError::Transition)?;

        if let Some(reason) = skip_reason(state, &next, action) {
            trace!(action = %action.kind, ?reason, "history entry skipped");
            return Ok(next);
        }

        // Delta direction is always (new, old).
        let delta = match self.differ.diff(&next.content()?, &state.content()?)? {
            Some(delta) => delta,
            None => {
                let reason = SkipReason::NoDifference;
                trace!(action = %action.kind, ?reason, "history entry skipped");
                return Ok(next);
            }
        };

        let history = next
            .history()
            .record(delta, self.clock.now_millis(), action.kind.as_str());
        debug!(action = %action.kind, cursor = history.cursor(), "history entry recorded");

        Ok(Arc::new(next.with_history(history)))
    }

    /// Convert into the reducer shape a store accepts.
    pub fn into_reducer(self) -> Reducer<S, TrackError<E>> {
        Arc::new(move |state: Option<&Arc<S>>, action: &Action| self.apply(state, action))
    }
}

fn skip_reason<S>(state: &Arc<S>, next: &Arc<S>, action: &Action) -> Option<SkipReason> {
    if Arc::ptr_eq(state, next) {
        return Some(SkipReason::Unchanged);
    }
    if action.meta.skips_tracking() {
        return Some(SkipReason::OptedOut);
    }
    None
}

impl<S: Tracked + 'static, E> Clone for HistoryTracker<S, E> {
    fn clone(&self) -> Self {
        Self {
            transition: Arc::clone(&self.transition),
            initial: Arc::clone(&self.initial),
            differ: Arc::clone(&self.differ),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Delta, DiffError, FixedClock, HistoryLog, JsonState, HISTORY_KEY};
    use serde_json::{json, Value};
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_state(n: i64) -> Arc<JsonState> {
        Arc::new(JsonState::default().set("counter", json!(n)))
    }

    fn counter(state: &JsonState) -> i64 {
        state.get("counter").and_then(Value::as_i64).unwrap_or(0)
    }

    fn counter_reducer(
        state: &Arc<JsonState>,
        action: &Action,
    ) -> Result<Arc<JsonState>, Infallible> {
        Ok(match action.kind.as_str() {
            "INC" => Arc::new(state.set("counter", json!(counter(state) + 1))),
            "DEBUG_SET" => Arc::new(state.set("counter", action.payload.clone())),
            "TOUCH" => Arc::new(state.set("counter", json!(counter(state)))),
            _ => Arc::clone(state),
        })
    }

    fn tracker() -> HistoryTracker<JsonState, Infallible> {
        HistoryTracker::from_parts(
            Arc::new(counter_reducer),
            counter_state(0),
            Arc::new(JsonPatchDiffer),
            Arc::new(FixedClock(1_000)),
        )
    }

    #[test]
    fn first_transition_records_entry() {
        let tracker = tracker();
        let state = tracker.apply(None, &Action::new("INC")).unwrap();

        assert_eq!(counter(&state), 1);
        let history = state.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history.labels(), ["INC".to_string()]);
        assert_eq!(history.timestamps(), [1_000]);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn repeated_increments_advance_cursor() {
        let tracker = tracker();
        let mut state = tracker.apply(None, &Action::new("INC")).unwrap();
        for _ in 0..2 {
            state = tracker.apply(Some(&state), &Action::new("INC")).unwrap();
        }

        assert_eq!(counter(&state), 3);
        assert_eq!(state.history().cursor(), 2);
        assert_eq!(state.history().entries().len(), 3);
    }

    #[test]
    fn unchanged_reference_is_returned_as_is() {
        let tracker = tracker();
        let state = tracker.apply(None, &Action::new("INC")).unwrap();
        let next = tracker.apply(Some(&state), &Action::new("NOOP")).unwrap();

        assert!(Arc::ptr_eq(&state, &next));
        assert_eq!(next.history(), state.history());
    }

    #[test]
    fn opt_out_changes_state_without_recording() {
        let tracker = tracker();
        let state = tracker.apply(None, &Action::new("INC")).unwrap();

        let action = Action::new("DEBUG_SET").with_payload(json!(99)).untracked();
        let next = tracker.apply(Some(&state), &action).unwrap();

        assert_eq!(counter(&next), 99);
        assert_eq!(next.history().cursor(), 0);
        assert_eq!(next.history().len(), 1);
    }

    #[test]
    fn structurally_equal_state_is_not_recorded() {
        let tracker = tracker();
        let state = tracker.apply(None, &Action::new("INC")).unwrap();
        let next = tracker.apply(Some(&state), &Action::new("TOUCH")).unwrap();

        assert!(!Arc::ptr_eq(&state, &next));
        assert_eq!(next.history().len(), 1);
    }

    #[test]
    fn earlier_snapshots_are_not_mutated() {
        let tracker = tracker();
        let first = tracker.apply(None, &Action::new("INC")).unwrap();
        let entries_before = first.history().entries().to_vec();

        let second = tracker.apply(Some(&first), &Action::new("INC")).unwrap();
        let _third = tracker.apply(Some(&second), &Action::new("INC")).unwrap();

        assert_eq!(first.history().len(), 1);
        assert_eq!(first.history().entries(), entries_before.as_slice());
        assert_eq!(second.history().len(), 2);
    }

    #[test]
    fn delta_excludes_history_and_runs_new_to_old() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let differ = move |a: &Value, b: &Value| -> Result<Option<Delta>, DiffError> {
            captured.lock().unwrap().push((a.clone(), b.clone()));
            JsonPatchDiffer.diff(a, b)
        };
        let tracker = HistoryTracker::from_parts(
            Arc::new(counter_reducer),
            counter_state(0),
            Arc::new(differ),
            Arc::new(FixedClock(0)),
        );

        let state = tracker.apply(None, &Action::new("INC")).unwrap();
        tracker.apply(Some(&state), &Action::new("INC")).unwrap();

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 2);
        let (new, old) = &calls[1];
        assert_eq!(new, &json!({"counter": 2}));
        assert_eq!(old, &json!({"counter": 1}));
        assert!(new.get(HISTORY_KEY).is_none() && old.get(HISTORY_KEY).is_none());

        let recorded = serde_json::to_string(state.history().entries()).unwrap();
        assert!(!recorded.contains(HISTORY_KEY));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("reducer exploded")]
    struct Boom;

    #[test]
    fn transition_failure_propagates() {
        let tracker: HistoryTracker<JsonState, Boom> =
            HistoryTracker::new(|_: &Arc<JsonState>, _: &Action| Err(Boom), counter_state(0));

        let err = tracker.apply(None, &Action::new("INC")).unwrap_err();
        assert!(matches!(err, TrackError::Transition(Boom)));
        assert_eq!(err.to_string(), "reducer exploded");
    }

    #[test]
    fn diff_failure_propagates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let differ = move |_: &Value, _: &Value| -> Result<Option<Delta>, DiffError> {
            counted.fetch_add(1, Ordering::SeqCst);
            Err(DiffError::Unsupported("cycle".to_string()))
        };
        let tracker = HistoryTracker::from_parts(
            Arc::new(counter_reducer),
            counter_state(0),
            Arc::new(differ),
            Arc::new(FixedClock(0)),
        );

        let err = tracker.apply(None, &Action::new("INC")).unwrap_err();
        assert!(matches!(err, TrackError::Diff(DiffError::Unsupported(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn skipped_transitions_never_reach_differ() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let differ = move |a: &Value, b: &Value| -> Result<Option<Delta>, DiffError> {
            counted.fetch_add(1, Ordering::SeqCst);
            JsonPatchDiffer.diff(a, b)
        };
        let tracker = HistoryTracker::from_parts(
            Arc::new(counter_reducer),
            counter_state(0),
            Arc::new(differ),
            Arc::new(FixedClock(0)),
        );

        tracker.apply(None, &Action::new("NOOP")).unwrap();
        tracker.apply(None, &Action::new("INC").untracked()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn hydrated_history_keeps_growing() {
        let prior = HistoryLog::new().record(Delta::new(json!([])), 5, "LOADED");
        let initial = Arc::new(JsonState::default().set("counter", json!(10)).with_history(prior));
        let tracker = HistoryTracker::from_parts(
            Arc::new(counter_reducer),
            initial,
            Arc::new(JsonPatchDiffer),
            Arc::new(FixedClock(6)),
        );

        let state = tracker.apply(None, &Action::new("INC")).unwrap();
        assert_eq!(state.history().labels(), ["LOADED".to_string(), "INC".to_string()]);
        assert_eq!(state.history().cursor(), 1);
    }

    #[test]
    fn into_reducer_behaves_like_apply() {
        let reducer = tracker().into_reducer();
        let state = reducer(None, &Action::new("INC")).unwrap();
        assert_eq!(state.history().len(), 1);
    }
}
