//! Build errors for transition table construction.

use thiserror::Error;

/// Errors that can occur when building a transition table.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("No transitions declared. Add at least one .transition(name, from, to)")]
    NoTransitions,

    #[error("Failure state not specified. Call .fail_to(state) before .build()")]
    MissingFailureState,

    #[error("Ambiguous edge: transition '{name}' is declared twice out of state '{from}'")]
    AmbiguousEdge { name: &'static str, from: String },

    #[error("Transition '{name}' leaves terminal state '{from}'")]
    EdgeFromTerminal { name: &'static str, from: String },

    #[error("Failure state '{state}' does not report is_failure()")]
    FailureStateNotFailure { state: String },
}
