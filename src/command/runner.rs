//! The public entry point that drives a command through its phases.

use super::{Command, Phase, PhaseAction};
use crate::core::{State, TransitionTable};
use crate::dispatch::{DispatchError, Dispatched, Dispatcher};
use crate::hooks::HookRegistry;
use std::sync::Arc;

use super::RuntimeError;

/// How a driven attempt ended, as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The instance reached the destination (or final) state.
    Succeeded,
    /// A failure was recorded and the instance was redirected to the
    /// failure state.
    Failed,
}

impl Outcome {
    /// Whether the attempt succeeded.
    pub fn is_succeeded(self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    /// Whether the attempt was routed to the failure state.
    pub fn is_failed(self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

/// Drives command instances through their transitions.
///
/// The runner owns nothing mutable: it reads a shared registry (and the
/// table the registry is bound to), so one runner serves any number of
/// instances across threads. Domain failures are caught here, recorded
/// on the instance, and routed to the failure state; they never escape
/// as `Err`. Structural errors ([`DispatchError`]) do escape,
/// immediately.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use cadence::builder::TableBuilder;
/// use cadence::command::{Command, Lifecycle, Outcome, Runner, RuntimeError};
/// use cadence::hooks::HookRegistry;
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
///         Ok(21)
///     }
/// }
///
/// let table = Arc::new(
///     TableBuilder::new()
///         .transition("validate", CommandState::Initialized, CommandState::Validating)
///         .transition("execute", CommandState::Validating, CommandState::Executing)
///         .transition("complete", CommandState::Executing, CommandState::Succeeded)
///         .fail_to(CommandState::Failed)
///         .build()
///         .unwrap(),
/// );
///
/// let mut registry: HookRegistry<Answer> = HookRegistry::new(table);
/// registry
///     .around_transition("execute", |cmd, next| {
///         let value = next.proceed(cmd)?;
///         Ok(value.map(|n| n * 2))
///     })
///     .unwrap();
///
/// let runner = Runner::new(Arc::new(registry));
/// let mut cmd = Answer {
///     lifecycle: Lifecycle::new(CommandState::Initialized),
/// };
///
/// assert_eq!(runner.execute(&mut cmd).unwrap(), Outcome::Succeeded);
/// assert_eq!(cmd.result(), Some(&42));
/// ```
pub struct Runner<C: Command> {
    registry: Arc<HookRegistry<C>>,
}

impl<C: Command> Runner<C> {
    /// Create a runner over a shared registry.
    pub fn new(registry: Arc<HookRegistry<C>>) -> Self {
        Self { registry }
    }

    /// The registry this runner dispatches through.
    pub fn registry(&self) -> &Arc<HookRegistry<C>> {
        &self.registry
    }

    /// The transition table of the command family.
    pub fn table(&self) -> &TransitionTable<C::State> {
        self.registry.table()
    }

    /// Run the validate phase alone.
    ///
    /// Succeeds trivially when the phase script declares no validate
    /// phase.
    pub fn validate(&self, cmd: &mut C) -> Result<Outcome, DispatchError> {
        match C::phases()
            .iter()
            .find(|p| p.action == PhaseAction::Validate)
        {
            Some(phase) => self.run_phase(cmd, phase),
            None => Ok(Outcome::Succeeded),
        }
    }

    /// Drive the remaining phases of the script from the instance's
    /// current state.
    ///
    /// Phases whose source state was already passed (a prior
    /// [`validate`](Self::validate) call, say) are skipped; once the
    /// script engages, every subsequent phase must be legal from where
    /// the previous one left the instance.
    pub fn execute(&self, cmd: &mut C) -> Result<Outcome, DispatchError> {
        let mut progressed = false;
        for phase in C::phases() {
            let state = cmd.lifecycle().state().clone();
            if state.is_failure() {
                return Ok(Outcome::Failed);
            }
            if self.table().destination(&state, phase.transition).is_none() {
                if progressed {
                    return Err(DispatchError::InvalidTransition {
                        transition: phase.transition.to_string(),
                        from: state.name().to_string(),
                    });
                }
                continue;
            }
            // Errors recorded by an earlier phase's after callbacks
            // route here instead of dispatching further.
            if !cmd.lifecycle().errors().is_empty() {
                self.fail(cmd, phase.transition);
                return Ok(Outcome::Failed);
            }
            progressed = true;
            if self.run_phase(cmd, phase)?.is_failed() {
                return Ok(Outcome::Failed);
            }
        }
        if !progressed {
            let first = C::phases().first().map_or("execute", |p| p.transition);
            return Err(DispatchError::InvalidTransition {
                transition: first.to_string(),
                from: cmd.lifecycle().state().name().to_string(),
            });
        }
        Ok(Outcome::Succeeded)
    }

    /// Dispatch one named transition with an explicit core action.
    ///
    /// This is the generic escape hatch behind
    /// [`validate`](Self::validate) and [`execute`](Self::execute); the
    /// action's `Ok` value becomes the provisional result the around
    /// chain sees.
    pub fn trigger<F>(&self, cmd: &mut C, name: &str, mut action: F) -> Result<Outcome, DispatchError>
    where
        F: FnMut(&mut C) -> Result<Option<C::Output>, RuntimeError>,
    {
        let from = cmd.lifecycle().state().clone();
        let Some(to) = self.table().destination(&from, name) else {
            return Err(DispatchError::InvalidTransition {
                transition: name.to_string(),
                from: from.name().to_string(),
            });
        };
        let event = crate::core::TransitionEvent::new(name, from, to);
        match Dispatcher::new(&self.registry).dispatch(cmd, &event, &mut action)? {
            Dispatched::Completed => Ok(Outcome::Succeeded),
            Dispatched::Aborted => {
                self.fail(cmd, name);
                Ok(Outcome::Failed)
            }
        }
    }

    fn run_phase(&self, cmd: &mut C, phase: &Phase) -> Result<Outcome, DispatchError> {
        tracing::debug!(
            id = %cmd.lifecycle().id(),
            transition = phase.transition,
            "running phase"
        );
        match phase.action {
            PhaseAction::Validate => {
                self.trigger(cmd, phase.transition, |c: &mut C| c.validate().map(|()| None))
            }
            PhaseAction::Perform => {
                self.trigger(cmd, phase.transition, |c: &mut C| c.perform().map(Some))
            }
            PhaseAction::Advance => self.trigger(cmd, phase.transition, |_: &mut C| Ok(None)),
        }
    }

    fn fail(&self, cmd: &mut C, attempted: &str) {
        let failure = self.table().failure_state().clone();
        tracing::warn!(
            id = %cmd.lifecycle().id(),
            transition = attempted,
            errors = cmd.lifecycle().errors().len(),
            "attempt failed, redirecting to failure state"
        );
        cmd.lifecycle_mut().commit(attempted, failure);
    }
}

impl<C: Command> Clone for Runner<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}
