//! Installs the history tracker in front of a state container.

use crate::core::{Action, Clock, Differ, JsonPatchDiffer, SystemClock, Tracked};
use crate::store::container::StoreFactory;
use crate::tracking::{HistoryTracker, TrackError};
use std::sync::Arc;

/// Start wiring history tracking into a store.
///
/// `hydrated` is used as the starting state when the caller does not pass
/// one to [`EnhancedFactory::create`]. It replaces the whole state, history
/// included; nothing is merged after the first transition.
///
/// # Example
///
/// ```rust
/// use state_trail::core::{Action, JsonState, Tracked};
/// use state_trail::store::{install, BasicStoreFactory};
/// use serde_json::json;
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// let factory = install::<JsonState>(None).enhance(BasicStoreFactory);
/// let mut store = factory
///     .create(
///         |state: &Arc<JsonState>, action: &Action| -> Result<Arc<JsonState>, Infallible> {
///             match action.kind.as_str() {
///                 "SET" => Ok(Arc::new(state.set("value", action.payload.clone()))),
///                 _ => Ok(Arc::clone(state)),
///             }
///         },
///         None,
///     )
///     .unwrap();
///
/// store.dispatch(&Action::new("SET").with_payload(json!(1))).unwrap();
/// assert_eq!(store.state().history().len(), 1);
/// ```
pub fn install<S: Tracked + 'static>(hydrated: Option<Arc<S>>) -> HistoryEnhancer<S> {
    HistoryEnhancer {
        hydrated,
        differ: Arc::new(JsonPatchDiffer),
        clock: Arc::new(SystemClock),
    }
}

/// Tracking settings captured before a store factory is known.
pub struct HistoryEnhancer<S: Tracked + 'static> {
    hydrated: Option<Arc<S>>,
    differ: Arc<dyn Differ>,
    clock: Arc<dyn Clock>,
}

impl<S: Tracked + 'static> HistoryEnhancer<S> {
    /// Replace the default [`JsonPatchDiffer`].
    pub fn differ<D: Differ + 'static>(mut self, differ: D) -> Self {
        self.differ = Arc::new(differ);
        self
    }

    /// Replace the default [`SystemClock`].
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn enhance<F>(self, factory: F) -> EnhancedFactory<S, F> {
        EnhancedFactory {
            enhancer: self,
            factory,
        }
    }
}

/// A store factory whose reducers are wrapped in a [`HistoryTracker`].
pub struct EnhancedFactory<S: Tracked + 'static, F> {
    enhancer: HistoryEnhancer<S>,
    factory: F,
}

impl<S, F> EnhancedFactory<S, F>
where
    S: Tracked + Default + 'static,
{
    /// Wrap `transition` and hand it to the underlying factory.
    ///
    /// The starting state is `initial`, else the hydrated state, else a
    /// fresh `S::default()`.
    pub fn create<T, E>(
        &self,
        transition: T,
        initial: Option<Arc<S>>,
    ) -> Result<F::Store, TrackError<E>>
    where
        T: Fn(&Arc<S>, &Action) -> Result<Arc<S>, E> + Send + Sync + 'static,
        E: std::error::Error + 'static,
        F: StoreFactory<S, TrackError<E>>,
    {
        let effective = initial
            .or_else(|| self.enhancer.hydrated.clone())
            .unwrap_or_else(|| Arc::new(S::default()));

        let tracker = HistoryTracker::from_parts(
            Arc::new(transition),
            effective,
            Arc::clone(&self.enhancer.differ),
            Arc::clone(&self.enhancer.clock),
        );
        self.factory.create_store(tracker.into_reducer(), None)
    }
}
