//! One transition attempt, end to end.

use super::continuation::{run_chain, CoreAction};
use crate::command::Command;
use crate::core::{State, TransitionEvent};
use crate::hooks::{HookKind, HookRegistry};
use std::cell::Cell;
use thiserror::Error;

/// Structural dispatch errors.
///
/// These indicate programmer error and surface immediately to the
/// caller; the dispatcher never converts them into recorded failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No transition '{transition}' out of state '{from}'")]
    InvalidTransition { transition: String, from: String },

    #[error("Around callback for transition '{transition}' invoked its continuation more than once")]
    Protocol { transition: String },
}

/// How one dispatch attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// The chain ran to completion and the commit happened.
    Completed,
    /// A before callback, the core action, or an around layer recorded a
    /// failure; nothing was committed.
    Aborted,
}

/// Executes a single transition attempt with full hook semantics.
///
/// The sequence is: before chain (the only short-circuit point), around
/// chain wrapping the core action, commit of the provisional result and
/// state, then the after chain. After callbacks run post-commit and are
/// never handed the result value; their failures are recorded but cannot
/// undo the commit.
pub struct Dispatcher<'a, C: Command> {
    registry: &'a HookRegistry<C>,
}

impl<'a, C: Command> Dispatcher<'a, C> {
    /// Create a dispatcher reading from one registry.
    pub fn new(registry: &'a HookRegistry<C>) -> Self {
        Self { registry }
    }

    /// Run one transition attempt.
    ///
    /// Domain failures abort the attempt and are left recorded on the
    /// instance for the caller to route; structural failures return
    /// `Err` and must not be caught.
    pub fn dispatch(
        &self,
        cmd: &mut C,
        event: &TransitionEvent<'_, C::State>,
        action: CoreAction<'_, C>,
    ) -> Result<Dispatched, DispatchError> {
        tracing::debug!(
            transition = event.transition,
            from = event.from.name(),
            to = event.to.name(),
            "dispatching transition"
        );

        for hook in self.registry.resolve_simple(event, HookKind::Before) {
            if let Err(error) = hook(cmd) {
                cmd.lifecycle_mut().push_error(error);
            }
            if !cmd.lifecycle().errors().is_empty() {
                tracing::debug!(transition = event.transition, "before callback aborted attempt");
                return Ok(Dispatched::Aborted);
            }
        }

        let around = self.registry.resolve_around(event);
        let violated = Cell::new(false);
        let outcome = run_chain(cmd, &around, action, &violated);
        if violated.get() {
            tracing::warn!(transition = event.transition, "continuation invoked more than once");
            return Err(DispatchError::Protocol {
                transition: event.transition.to_string(),
            });
        }
        let provisional = match outcome {
            Ok(value) => value,
            Err(error) => {
                cmd.lifecycle_mut().push_error(error);
                return Ok(Dispatched::Aborted);
            }
        };
        if !cmd.lifecycle().errors().is_empty() {
            return Ok(Dispatched::Aborted);
        }

        let lifecycle = cmd.lifecycle_mut();
        if let Some(value) = provisional {
            lifecycle.set_result(value);
        }
        lifecycle.commit(event.transition, event.to.clone());

        for hook in self.registry.resolve_simple(event, HookKind::After) {
            if let Err(error) = hook(cmd) {
                // Post-commit: record and keep going.
                cmd.lifecycle_mut().push_error(error);
            }
        }

        Ok(Dispatched::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;
    use crate::command::{Lifecycle, RuntimeError};
    use crate::core::TransitionTable;
    use crate::hooks::Selector;
    use crate::lifecycle_states;
    use std::sync::Arc;

    lifecycle_states! {
        enum TestState {
            Ready,
            final Done,
            error Broken,
        }
    }

    struct Probe {
        lifecycle: Lifecycle<TestState, i32>,
        log: Vec<String>,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                lifecycle: Lifecycle::new(TestState::Ready),
                log: Vec::new(),
            }
        }
    }

    impl Command for Probe {
        type State = TestState;
        type Output = i32;

        fn lifecycle(&self) -> &Lifecycle<TestState, i32> {
            &self.lifecycle
        }

        fn lifecycle_mut(&mut self) -> &mut Lifecycle<TestState, i32> {
            &mut self.lifecycle
        }

        fn perform(&mut self) -> Result<i32, RuntimeError> {
            Ok(21)
        }
    }

    fn table() -> Arc<TransitionTable<TestState>> {
        Arc::new(
            TableBuilder::new()
                .transition("run", TestState::Ready, TestState::Done)
                .fail_to(TestState::Broken)
                .build()
                .unwrap(),
        )
    }

    fn event() -> TransitionEvent<'static, TestState> {
        TransitionEvent::new("run", TestState::Ready, TestState::Done)
    }

    fn action(cmd: &mut Probe) -> Result<Option<i32>, RuntimeError> {
        cmd.log.push("action".into());
        Ok(Some(21))
    }

    #[test]
    fn before_chain_runs_in_priority_order_before_the_action() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .before_with_priority(Selector::transition("run"), 90, |cmd: &mut Probe| {
                cmd.log.push("late".into());
                Ok(())
            })
            .unwrap();
        registry
            .before_with_priority(Selector::transition("run"), 10, |cmd: &mut Probe| {
                cmd.log.push("early".into());
                Ok(())
            })
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(outcome, Dispatched::Completed);
        assert_eq!(probe.log, vec!["early", "late", "action"]);
    }

    #[test]
    fn before_error_aborts_everything_downstream() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .before_with_priority(Selector::transition("run"), 10, |_: &mut Probe| {
                Err(RuntimeError::new("not allowed"))
            })
            .unwrap();
        registry
            .before_transition("run", |cmd: &mut Probe| {
                cmd.log.push("second before".into());
                Ok(())
            })
            .unwrap();
        registry
            .after_transition("run", |cmd: &mut Probe| {
                cmd.log.push("after".into());
                Ok(())
            })
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(outcome, Dispatched::Aborted);
        assert!(probe.log.is_empty());
        assert_eq!(probe.errors().messages(), vec!["not allowed"]);
        assert_eq!(*probe.state(), TestState::Ready);
        assert!(probe.result().is_none());
    }

    #[test]
    fn before_recording_an_error_aborts_like_a_raise() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .before_transition("run", |cmd: &mut Probe| {
                cmd.add_runtime_error("soft failure");
                Ok(())
            })
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(outcome, Dispatched::Aborted);
        assert!(probe.log.is_empty());
        assert_eq!(probe.errors().messages(), vec!["soft failure"]);
    }

    #[test]
    fn around_transforms_the_provisional_result() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .around_transition("run", |cmd: &mut Probe, next| {
                let value = next.proceed(cmd)?;
                Ok(value.map(|n| n * 2))
            })
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(outcome, Dispatched::Completed);
        assert_eq!(probe.result(), Some(&42));
        assert_eq!(*probe.state(), TestState::Done);
    }

    #[test]
    fn lower_priority_around_wraps_outer() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .around_with_priority(Selector::transition("run"), 90, |cmd: &mut Probe, next| {
                cmd.log.push("pre-inner".into());
                let value = next.proceed(cmd);
                cmd.log.push("post-inner".into());
                value
            })
            .unwrap();
        registry
            .around_with_priority(Selector::transition("run"), 10, |cmd: &mut Probe, next| {
                cmd.log.push("pre-outer".into());
                let value = next.proceed(cmd);
                cmd.log.push("post-outer".into());
                value
            })
            .unwrap();

        let mut probe = Probe::new();
        Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut |_: &mut Probe| Ok(None))
            .unwrap();

        assert_eq!(
            probe.log,
            vec!["pre-outer", "pre-inner", "post-inner", "post-outer"]
        );
    }

    #[test]
    fn around_skipping_proceed_supplies_its_own_result() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .around_transition("run", |_: &mut Probe, _next| Ok(Some(7)))
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(outcome, Dispatched::Completed);
        assert!(probe.log.is_empty());
        assert_eq!(probe.result(), Some(&7));
    }

    #[test]
    fn double_proceed_is_a_protocol_error_even_when_swallowed() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .around_transition("run", |cmd: &mut Probe, next| {
                let first = next.proceed(cmd)?;
                let _ = next.proceed(cmd);
                Ok(first)
            })
            .unwrap();

        let mut probe = Probe::new();
        let result = Dispatcher::new(&registry).dispatch(&mut probe, &event(), &mut action);

        assert_eq!(
            result.unwrap_err(),
            DispatchError::Protocol {
                transition: "run".into()
            }
        );
    }

    #[test]
    fn around_can_recover_from_a_failing_action() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .around_transition("run", |cmd: &mut Probe, next| match next.proceed(cmd) {
                Ok(value) => Ok(value),
                Err(_) => Ok(Some(5)),
            })
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut |_: &mut Probe| {
                Err(RuntimeError::new("flaky"))
            })
            .unwrap();

        assert_eq!(outcome, Dispatched::Completed);
        assert_eq!(probe.result(), Some(&5));
        assert!(probe.errors().is_empty());
    }

    #[test]
    fn unrecovered_action_error_aborts_the_attempt() {
        let registry: HookRegistry<Probe> = HookRegistry::new(table());

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut |_: &mut Probe| {
                Err(RuntimeError::new("flaky"))
            })
            .unwrap();

        assert_eq!(outcome, Dispatched::Aborted);
        assert_eq!(probe.errors().messages(), vec!["flaky"]);
        assert_eq!(*probe.state(), TestState::Ready);
    }

    #[test]
    fn after_chain_runs_post_commit_without_the_result_argument() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .after_transition("run", |cmd: &mut Probe| {
                let state = cmd.state().name().to_string();
                let committed = cmd.result().copied();
                cmd.log.push(format!("after state={state} result={committed:?}"));
                Ok(())
            })
            .unwrap();

        let mut probe = Probe::new();
        Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(
            probe.log,
            vec!["action", "after state=Done result=Some(21)"]
        );
    }

    #[test]
    fn after_error_is_recorded_but_cannot_undo_the_commit() {
        let mut registry: HookRegistry<Probe> = HookRegistry::new(table());
        registry
            .after_with_priority(Selector::transition("run"), 10, |_: &mut Probe| {
                Err(RuntimeError::new("reporting failed"))
            })
            .unwrap();
        registry
            .after_transition("run", |cmd: &mut Probe| {
                cmd.log.push("second after".into());
                Ok(())
            })
            .unwrap();

        let mut probe = Probe::new();
        let outcome = Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        assert_eq!(outcome, Dispatched::Completed);
        assert_eq!(*probe.state(), TestState::Done);
        assert_eq!(probe.result(), Some(&21));
        assert_eq!(probe.errors().messages(), vec!["reporting failed"]);
        assert_eq!(probe.log, vec!["action", "second after"]);
    }

    #[test]
    fn history_records_the_committed_transition() {
        let registry: HookRegistry<Probe> = HookRegistry::new(table());

        let mut probe = Probe::new();
        Dispatcher::new(&registry)
            .dispatch(&mut probe, &event(), &mut action)
            .unwrap();

        let record = probe.lifecycle().history().last().unwrap();
        assert_eq!(record.transition, "run");
        assert_eq!(record.from, TestState::Ready);
        assert_eq!(record.to, TestState::Done);
    }
}
