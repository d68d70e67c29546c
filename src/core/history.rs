//! Append-only history log embedded in the state tree.
//!
//! A [`HistoryLog`] is an immutable value: [`HistoryLog::record`] returns a
//! new log and leaves the receiver untouched, so every snapshot that still
//! holds an older log keeps seeing exactly what it saw before.

use super::diff::Delta;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Broken invariant found in a hydrated or hand-built log.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HistoryViolation {
    #[error(
        "Parallel sequences differ in length \
         (entries: {entries}, timestamps: {timestamps}, labels: {labels})"
    )]
    LengthMismatch {
        entries: usize,
        timestamps: usize,
        labels: usize,
    },

    #[error("Cursor {cursor} does not point at the last entry (expected {expected})")]
    CursorMismatch { cursor: i64, expected: i64 },
}

/// Borrowed view of one recorded transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryEntry<'a> {
    pub index: usize,
    pub delta: &'a Delta,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub label: &'a str,
}

impl HistoryEntry<'_> {
    /// Wall-clock time of recording, if the timestamp is representable.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Deltas, timestamps and labels of every recorded transition, oldest first.
///
/// Cloning a log is shallow: the three sequences are shared until the next
/// [`record`](HistoryLog::record) allocates fresh copies of each.
///
/// # Example
///
/// ```rust
/// use state_trail::core::{Delta, HistoryLog};
/// use serde_json::json;
///
/// let log = HistoryLog::new();
/// assert_eq!(log.cursor(), -1);
///
/// let next = log.record(Delta::new(json!([])), 1_700_000_000_000, "INC");
/// assert_eq!(next.cursor(), 0);
/// assert_eq!(next.labels(), ["INC".to_string()]);
/// assert!(log.is_empty()); // Original unchanged
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Arc<Vec<Delta>>,
    timestamps: Arc<Vec<i64>>,
    labels: Arc<Vec<String>>,
    cursor: i64,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    /// Create an empty log with its cursor before the first entry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Vec::new()),
            timestamps: Arc::new(Vec::new()),
            labels: Arc::new(Vec::new()),
            cursor: -1,
        }
    }

    /// Append one entry, returning a new log.
    ///
    /// Each sequence is copied before the push so no previously returned
    /// log can observe the append. The cursor saturates at `i64::MAX`.
    pub fn record(&self, delta: Delta, timestamp: i64, label: impl Into<String>) -> Self {
        let mut entries = Vec::clone(&self.entries);
        entries.push(delta);

        let mut timestamps = Vec::clone(&self.timestamps);
        timestamps.push(timestamp);

        let mut labels = Vec::clone(&self.labels);
        labels.push(label.into());

        Self {
            entries: Arc::new(entries),
            timestamps: Arc::new(timestamps),
            labels: Arc::new(labels),
            cursor: self.cursor.saturating_add(1),
        }
    }

    pub fn entries(&self) -> &[Delta] {
        &self.entries
    }

    /// Recording times in milliseconds since the Unix epoch.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the most recent entry; `-1` when nothing has been recorded.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<HistoryEntry<'_>> {
        let delta = self.entries.get(index)?;
        let timestamp = *self.timestamps.get(index)?;
        let label = self.labels.get(index)?;
        Some(HistoryEntry {
            index,
            delta,
            timestamp,
            label,
        })
    }

    /// The entry the cursor points at.
    pub fn latest(&self) -> Option<HistoryEntry<'_>> {
        usize::try_from(self.cursor)
            .ok()
            .and_then(|index| self.entry(index))
    }

    /// Iterate entries oldest first. Stops at the shortest sequence.
    pub fn iter(&self) -> impl Iterator<Item = HistoryEntry<'_>> + '_ {
        (0..self.len()).map_while(move |index| self.entry(index))
    }

    /// Time between the first and last recorded entries.
    ///
    /// Returns `None` for an empty log or when the clock went backwards.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.timestamps.first()?, self.timestamps.last()?);
        let millis = last.checked_sub(*first)?;
        u64::try_from(millis).ok().map(Duration::from_millis)
    }

    /// Check the log invariants, reporting every violation at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<HistoryViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<HistoryViolation>>> = Vec::new();

        let (entries, timestamps, labels) =
            (self.entries.len(), self.timestamps.len(), self.labels.len());
        checks.push(if entries == timestamps && entries == labels {
            Validation::success(())
        } else {
            Validation::fail(HistoryViolation::LengthMismatch {
                entries,
                timestamps,
                labels,
            })
        });

        let expected = i64::try_from(entries).map_or(i64::MAX, |n| n - 1);
        checks.push(if self.cursor == expected {
            Validation::success(())
        } else {
            Validation::fail(HistoryViolation::CursorMismatch {
                cursor: self.cursor,
                expected,
            })
        });

        Validation::all_vec(checks).map(|_| ())
    }
}
