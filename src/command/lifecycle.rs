//! Per-instance lifecycle state.
//!
//! Every command instance embeds a [`Lifecycle`] record. All mutable
//! dispatch state (current state, recorded errors, the committed result,
//! the transition history) lives here, so distinct instances can be
//! driven on distinct threads without shared engine state.

use super::errors::{ErrorLog, RuntimeError};
use crate::core::{History, State};
use uuid::Uuid;

/// The mutable lifecycle record embedded in a command instance.
///
/// `S` is the command family's state enum; `T` is the command's output
/// type, stored here once the execute transition commits.
#[derive(Clone, Debug)]
pub struct Lifecycle<S: State, T> {
    id: Uuid,
    state: S,
    errors: ErrorLog,
    result: Option<T>,
    history: History<S>,
}

impl<S: State, T> Lifecycle<S, T> {
    /// Create a lifecycle record positioned at the initial state.
    pub fn new(initial: S) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: initial,
            errors: ErrorLog::new(),
            result: None,
            history: History::new(),
        }
    }

    /// Unique id for this instance, used in tracing output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Record a domain failure. The eventual outcome of the current (or
    /// next) transition attempt routes to the failure state.
    pub fn add_runtime_error(&mut self, message: impl Into<String>) {
        self.errors.push(RuntimeError::new(message));
    }

    /// Recorded errors, oldest first.
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// The committed result, if the execute transition has committed one.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take ownership of the committed result.
    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    /// History of committed state changes, including failure redirects.
    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub(crate) fn push_error(&mut self, error: RuntimeError) {
        self.errors.push(error);
    }

    pub(crate) fn set_result(&mut self, result: T) {
        self.result = Some(result);
    }

    pub(crate) fn commit(&mut self, transition: &str, to: S) {
        let from = std::mem::replace(&mut self.state, to.clone());
        self.history.record(transition, from, to);
    }
}
