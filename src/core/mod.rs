//! Core data model for state history.
//!
//! This module contains the pure pieces the tracker is built from:
//! - Actions and their tracking metadata
//! - The append-only `HistoryLog` and the `Tracked` state seam
//! - The `Differ` and `Clock` collaborators
//!
//! Nothing here performs I/O; every operation returns new values.

mod action;
mod clock;
mod diff;
mod history;
mod state;

pub use action::{Action, ActionMeta, INIT_ACTION, SKIP_HISTORY_TRACKING};
pub use clock::{Clock, FixedClock, SystemClock};
pub use diff::{Delta, DiffError, Differ, JsonPatchDiffer};
pub use history::{HistoryEntry, HistoryLog, HistoryViolation};
pub use state::{JsonState, Tracked, HISTORY_KEY};
