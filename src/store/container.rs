//! Minimal synchronous state container.

use crate::core::Action;
use std::sync::Arc;
use tracing::debug;

/// Store-level transition: `state` is `None` on the container's first call.
pub type Reducer<S, E> =
    Arc<dyn Fn(Option<&Arc<S>>, &Action) -> Result<Arc<S>, E> + Send + Sync>;

/// Holds the current state and applies one action at a time.
pub struct Store<S, E> {
    current: Arc<S>,
    reducer: Reducer<S, E>,
    dispatched: usize,
}

impl<S, E> Store<S, E> {
    /// Create a store, running the reducer once with an init action to
    /// obtain the starting state.
    pub fn create(reducer: Reducer<S, E>, preloaded: Option<Arc<S>>) -> Result<Self, E> {
        let current = reducer(preloaded.as_ref(), &Action::init())?;
        debug!(preloaded = preloaded.is_some(), "store created");
        Ok(Self {
            current,
            reducer,
            dispatched: 0,
        })
    }

    /// Get current state (pure)
    pub fn state(&self) -> &Arc<S> {
        &self.current
    }

    /// Number of actions successfully dispatched since creation.
    pub fn dispatch_count(&self) -> usize {
        self.dispatched
    }

    /// Apply `action`. On error the current state is left as it was.
    pub fn dispatch(&mut self, action: &Action) -> Result<&Arc<S>, E> {
        let next = (self.reducer)(Some(&self.current), action)?;
        self.current = next;
        self.dispatched += 1;
        Ok(&self.current)
    }
}

/// Something that turns a reducer into a state container.
pub trait StoreFactory<S, E> {
    type Store;

    fn create_store(
        &self,
        reducer: Reducer<S, E>,
        preloaded: Option<Arc<S>>,
    ) -> Result<Self::Store, E>;
}

/// Factory for the built-in [`Store`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicStoreFactory;

impl<S, E> StoreFactory<S, E> for BasicStoreFactory {
    type Store = Store<S, E>;

    fn create_store(
        &self,
        reducer: Reducer<S, E>,
        preloaded: Option<Arc<S>>,
    ) -> Result<Self::Store, E> {
        Store::create(reducer, preloaded)
    }
}

impl<S, E, T, F> StoreFactory<S, E> for F
where
    F: Fn(Reducer<S, E>, Option<Arc<S>>) -> Result<T, E>,
{
    type Store = T;

    fn create_store(
        &self,
        reducer: Reducer<S, E>,
        preloaded: Option<Arc<S>>,
    ) -> Result<Self::Store, E> {
        self(reducer, preloaded)
    }
}
