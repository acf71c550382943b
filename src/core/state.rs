//! Core State trait for command lifecycle states.
//!
//! Every command family declares a closed set of states; this trait
//! classifies them without side effects so the dispatch engine can ask
//! "is this position terminal?" and "is this the failure position?"
//! purely.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for command lifecycle states.
///
/// States are immutable values drawn from a fixed, closed set per command
/// family. All methods are pure.
///
/// # Required Traits
///
/// - `Clone`: states are copied into events and history records
/// - `PartialEq`: selector matching and table lookup compare states
/// - `Debug`: states appear in errors and tracing output
/// - `Serialize` + `Deserialize`: history records are serializable
///
/// # Example
///
/// ```rust
/// use cadence::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum CommandState {
///     Initialized,
///     Validating,
///     Executing,
///     Succeeded,
///     Failed,
/// }
///
/// impl State for CommandState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Initialized => "Initialized",
///             Self::Validating => "Validating",
///             Self::Executing => "Executing",
///             Self::Succeeded => "Succeeded",
///             Self::Failed => "Failed",
///         }
///     }
///
///     fn is_terminal(&self) -> bool {
///         matches!(self, Self::Succeeded | Self::Failed)
///     }
///
///     fn is_failure(&self) -> bool {
///         matches!(self, Self::Failed)
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a terminal state.
    ///
    /// Terminal states have no outgoing transitions; the table builder
    /// rejects edges that leave one.
    ///
    /// Default implementation returns `false`.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Check if this is the failure position of the machine.
    ///
    /// Aborted transition attempts redirect the instance here. Failure
    /// states are typically also terminal, but this is not enforced.
    ///
    /// Default implementation returns `false`.
    fn is_failure(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initialized,
        Executing,
        Succeeded,
        Failed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initialized => "Initialized",
                Self::Executing => "Executing",
                Self::Succeeded => "Succeeded",
                Self::Failed => "Failed",
            }
        }

        fn is_terminal(&self) -> bool {
            matches!(self, Self::Succeeded | Self::Failed)
        }

        fn is_failure(&self) -> bool {
            matches!(self, Self::Failed)
        }
    }

    #[test]
    fn state_name_returns_declared_value() {
        assert_eq!(TestState::Initialized.name(), "Initialized");
        assert_eq!(TestState::Failed.name(), "Failed");
    }

    #[test]
    fn is_terminal_identifies_end_states() {
        assert!(!TestState::Initialized.is_terminal());
        assert!(!TestState::Executing.is_terminal());
        assert!(TestState::Succeeded.is_terminal());
        assert!(TestState::Failed.is_terminal());
    }

    #[test]
    fn is_failure_identifies_the_failure_position() {
        assert!(!TestState::Succeeded.is_failure());
        assert!(TestState::Failed.is_failure());
    }

    #[test]
    fn state_round_trips_through_json() {
        let state = TestState::Executing;
        let json = serde_json::to_string(&state).unwrap();
        let back: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
