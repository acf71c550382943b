//! The command integration surface.
//!
//! Commands implement the [`Command`] trait, embed a [`Lifecycle`]
//! record, and are driven through their transitions by a
//! [`Runner`](crate::command::Runner). Callbacks registered in a
//! [`HookRegistry`](crate::hooks::HookRegistry) observe and steer each
//! transition attempt.

pub mod errors;
pub mod lifecycle;
pub mod runner;

pub use errors::{ErrorLog, RuntimeError};
pub use lifecycle::Lifecycle;
pub use runner::{Outcome, Runner};

use crate::core::State;

/// How a phase's core action binds to the command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseAction {
    /// Run [`Command::validate`]; produces no result value.
    Validate,
    /// Run [`Command::perform`]; its return value is the provisional
    /// result committed to the instance.
    Perform,
    /// A bare state advance with no core action.
    Advance,
}

/// One step of a command's phase script: a transition name and the core
/// action dispatched inside it.
#[derive(Clone, Copy, Debug)]
pub struct Phase {
    /// Transition name, which must be declared in the family's table.
    pub transition: &'static str,
    /// The core action bound to the transition.
    pub action: PhaseAction,
}

/// The canonical phase script: validate, then perform, then a bare
/// advance into the terminal success state.
pub const CANONICAL_PHASES: &[Phase] = &[
    Phase {
        transition: "validate",
        action: PhaseAction::Validate,
    },
    Phase {
        transition: "execute",
        action: PhaseAction::Perform,
    },
    Phase {
        transition: "complete",
        action: PhaseAction::Advance,
    },
];

/// Contract for command-style objects driven by the engine.
///
/// A command declares its state family, its output type, and its core
/// actions, and embeds the [`Lifecycle`] record that carries all mutable
/// dispatch state.
///
/// # Example
///
/// ```rust
/// use cadence::command::{Command, Lifecycle, RuntimeError};
/// use cadence::lifecycle_states;
///
/// lifecycle_states! {
///     pub enum CommandState {
///         Initialized,
///         Validating,
///         Executing,
///         final Succeeded,
///         error Failed,
///     }
/// }
///
/// struct Answer {
///     lifecycle: Lifecycle<CommandState, i32>,
/// }
///
/// impl Command for Answer {
///     type State = CommandState;
///     type Output = i32;
///
///     fn lifecycle(&self) -> &Lifecycle<CommandState, i32> {
///         &self.lifecycle
///     }
///
///     fn lifecycle_mut(&mut self) -> &mut Lifecycle<CommandState, i32> {
///         &mut self.lifecycle
///     }
///
///     fn perform(&mut self) -> Result<i32, RuntimeError> {
///         Ok(42)
///     }
/// }
/// ```
pub trait Command: Sized + 'static {
    /// The command family's state enum.
    type State: State + 'static;
    /// The value produced by [`perform`](Self::perform) and committed to
    /// the instance.
    type Output: 'static;

    /// Read access to the embedded lifecycle record.
    fn lifecycle(&self) -> &Lifecycle<Self::State, Self::Output>;

    /// Mutable access to the embedded lifecycle record.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self::State, Self::Output>;

    /// The validation core action. Record failures via
    /// [`add_runtime_error`](Lifecycle::add_runtime_error) or return an
    /// error; either routes the instance to the failure state.
    fn validate(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// The business core action wrapped by the execute transition.
    fn perform(&mut self) -> Result<Self::Output, RuntimeError>;

    /// The ordered phase script [`Runner::execute`] drives. Each phase's
    /// transition must be declared in the family's table; override this
    /// when the table deviates from the canonical one.
    fn phases() -> &'static [Phase] {
        CANONICAL_PHASES
    }

    /// The current state (convenience accessor for callbacks).
    fn state(&self) -> &Self::State {
        self.lifecycle().state()
    }

    /// Record a domain failure against the instance.
    fn add_runtime_error(&mut self, message: impl Into<String>) {
        self.lifecycle_mut().add_runtime_error(message);
    }

    /// Recorded errors (convenience accessor for callbacks).
    fn errors(&self) -> &ErrorLog {
        self.lifecycle().errors()
    }

    /// The committed result, if any.
    fn result(&self) -> Option<&Self::Output> {
        self.lifecycle().result()
    }
}
