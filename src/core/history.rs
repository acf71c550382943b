//! Transition history tracking.
//!
//! Every committed transition (and every failure redirect) appends a
//! timestamped record to the owning instance's history, giving callbacks
//! and callers an audit trail of how the instance reached its current
//! state.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single committed state change.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// Name of the transition that was attempted. Failure redirects keep
    /// the name of the attempt that aborted.
    pub transition: String,
    /// The state the instance left.
    pub from: S,
    /// The state the instance entered.
    pub to: S,
    /// When the change was committed.
    pub at: DateTime<Utc>,
}

/// Ordered history of an instance's state changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct History<S: State> {
    records: Vec<TransitionRecord<S>>,
}

impl<S: State> Default for History<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> History<S> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record for a committed change.
    pub fn record(&mut self, transition: &str, from: S, to: S) {
        self.records.push(TransitionRecord {
            transition: transition.to_string(),
            from,
            to,
            at: Utc::now(),
        });
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[TransitionRecord<S>] {
        &self.records
    }

    /// The most recent record, if any change has been committed.
    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.records.last()
    }

    /// The sequence of states visited: each record's source, then the
    /// final record's destination.
    pub fn path(&self) -> Vec<&S> {
        let mut path: Vec<&S> = self.records.iter().map(|r| &r.from).collect();
        if let Some(last) = self.records.last() {
            path.push(&last.to);
        }
        path
    }

    /// Number of committed changes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any change has been committed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
