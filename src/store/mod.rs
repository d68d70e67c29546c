//! State container seam and the adapter that installs history tracking.
//!
//! The container itself is deliberately small: [`Store`] owns the current
//! state and pushes actions through a [`Reducer`] one at a time. Any other
//! container can take its place by implementing [`StoreFactory`].

mod container;
mod enhancer;

pub use container::{BasicStoreFactory, Reducer, Store, StoreFactory};
pub use enhancer::{install, EnhancedFactory, HistoryEnhancer};
