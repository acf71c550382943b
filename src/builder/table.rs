//! Builder for transition tables.

use crate::builder::error::BuildError;
use crate::core::{State, TransitionDef, TransitionTable};

/// Builder for declaring a command family's transition table.
///
/// Validation happens once, in [`build`](Self::build): edges must be
/// unambiguous on their `(from, name)` key, must not leave terminal
/// states, and the failure state must classify itself as a failure.
///
/// # Example
///
/// ```rust
/// use cadence::builder::TableBuilder;
/// use cadence::lifecycle_states;
///
/// lifecycle_states! {
///     pub enum CommandState {
///         Initialized,
///         Validating,
///         final Succeeded,
///         error Failed,
///     }
/// }
///
/// let table = TableBuilder::new()
///     .transition("validate", CommandState::Initialized, CommandState::Validating)
///     .transition("execute", CommandState::Validating, CommandState::Succeeded)
///     .fail_to(CommandState::Failed)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     table.destination(&CommandState::Initialized, "validate"),
///     Some(CommandState::Validating)
/// );
/// ```
pub struct TableBuilder<S: State> {
    edges: Vec<TransitionDef<S>>,
    failure_state: Option<S>,
}

impl<S: State> TableBuilder<S> {
    /// Create a new builder with no edges.
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            failure_state: None,
        }
    }

    /// Declare one edge.
    pub fn transition(mut self, name: &'static str, from: S, to: S) -> Self {
        self.edges.push(TransitionDef { name, from, to });
        self
    }

    /// Designate the failure state (required).
    pub fn fail_to(mut self, state: S) -> Self {
        self.failure_state = Some(state);
        self
    }

    /// Validate the declarations and build the table.
    pub fn build(self) -> Result<TransitionTable<S>, BuildError> {
        if self.edges.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let failure_state = self.failure_state.ok_or(BuildError::MissingFailureState)?;
        if !failure_state.is_failure() {
            return Err(BuildError::FailureStateNotFailure {
                state: failure_state.name().to_string(),
            });
        }

        for (i, edge) in self.edges.iter().enumerate() {
            if edge.from.is_terminal() {
                return Err(BuildError::EdgeFromTerminal {
                    name: edge.name,
                    from: edge.from.name().to_string(),
                });
            }
            let duplicate = self.edges[..i]
                .iter()
                .any(|e| e.name == edge.name && e.from == edge.from);
            if duplicate {
                return Err(BuildError::AmbiguousEdge {
                    name: edge.name,
                    from: edge.from.name().to_string(),
                });
            }
        }

        Ok(TransitionTable::new(self.edges, failure_state))
    }
}

impl<S: State> Default for TableBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
