//! The callback registry.
//!
//! Per-command-type, append-only store of registered callbacks. Built
//! mutably during startup, then shared behind `Arc` for read-many
//! dispatch; the engine provides no locking for registration during
//! dispatch.

use super::entry::{AroundHook, HookEntry, HookFn, HookKind, Priority, SimpleHook};
use super::error::ConfigError;
use super::selector::Selector;
use crate::command::{Command, RuntimeError};
use crate::core::{TransitionEvent, TransitionTable};
use crate::dispatch::Continuation;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// One counter for the whole process, so equal-priority entries across an
// ancestor chain tie-break by absolute registration order.
static REGISTRATION_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    REGISTRATION_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Append-only callback registry for one command type.
///
/// Registration validates selectors against the family's transition
/// table; resolution gathers matching entries ancestor-first and sorts
/// them by `(priority, registration order)` ascending, the single
/// ordering rule used for before, after, and around callbacks alike.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use cadence::builder::TableBuilder;
/// use cadence::command::{Command, Lifecycle, RuntimeError};
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
/// struct Noop {
///     lifecycle: Lifecycle<CommandState, ()>,
/// }
///
/// impl Command for Noop {
///     type State = CommandState;
///     type Output = ();
///
///     fn lifecycle(&self) -> &Lifecycle<CommandState, ()> {
///         &self.lifecycle
///     }
///
///     fn lifecycle_mut(&mut self) -> &mut Lifecycle<CommandState, ()> {
///         &mut self.lifecycle
///     }
///
///     fn perform(&mut self) -> Result<(), RuntimeError> {
///         Ok(())
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
/// let mut registry: HookRegistry<Noop> = HookRegistry::new(table);
/// registry
///     .before_transition("execute", |cmd| {
///         tracing::debug!(state = cmd.state().name(), "about to execute");
///         Ok(())
///     })
///     .unwrap();
/// # use cadence::core::State;
/// ```
pub struct HookRegistry<C: Command> {
    table: Arc<TransitionTable<C::State>>,
    parent: Option<Arc<HookRegistry<C>>>,
    entries: Vec<Arc<HookEntry<C>>>,
}

impl<C: Command> HookRegistry<C> {
    /// Create an empty registry bound to a family's transition table.
    pub fn new(table: Arc<TransitionTable<C::State>>) -> Self {
        Self {
            table,
            parent: None,
            entries: Vec::new(),
        }
    }

    /// Create a registry that inherits every entry of `parent`.
    ///
    /// Dispatch through the child sees ancestor entries concatenated
    /// ahead of its own before the final sort, walking the whole chain.
    pub fn extending(parent: Arc<HookRegistry<C>>) -> Self {
        Self {
            table: Arc::clone(&parent.table),
            parent: Some(parent),
            entries: Vec::new(),
        }
    }

    /// The transition table this registry validates against.
    pub fn table(&self) -> &Arc<TransitionTable<C::State>> {
        &self.table
    }

    /// Number of entries registered directly on this registry
    /// (ancestors excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this registry (ancestors excluded) has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check(&self, selector: &Selector<C::State>) -> Result<(), ConfigError> {
        if let Some(name) = selector.transition {
            if !self.table.declares(name) {
                return Err(ConfigError::UnknownTransition { name });
            }
        }
        let matchable = self.table.declares_matching(
            selector.transition,
            selector.from.as_ref(),
            selector.to.as_ref(),
        );
        if !matchable {
            return Err(ConfigError::UnmatchableSelector {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    fn push(
        &mut self,
        callback: HookFn<C>,
        selector: Selector<C::State>,
        priority: Priority,
    ) -> Result<(), ConfigError> {
        self.check(&selector)?;
        let entry = HookEntry {
            callback,
            selector,
            priority,
            seq: next_seq(),
        };
        tracing::debug!(kind = %entry.kind(), selector = %entry.selector, priority = %priority, "hook registered");
        self.entries.push(Arc::new(entry));
        Ok(())
    }

    /// Register a before callback for the events `selector` matches.
    pub fn before<F>(&mut self, selector: Selector<C::State>, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.before_with_priority(selector, Priority::DEFAULT, f)
    }

    /// Register a before callback with an explicit priority.
    pub fn before_with_priority<F>(
        &mut self,
        selector: Selector<C::State>,
        priority: impl Into<Priority>,
        f: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.push(HookFn::Before(Arc::new(f)), selector, priority.into())
    }

    /// Register an after callback for the events `selector` matches.
    pub fn after<F>(&mut self, selector: Selector<C::State>, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.after_with_priority(selector, Priority::DEFAULT, f)
    }

    /// Register an after callback with an explicit priority.
    pub fn after_with_priority<F>(
        &mut self,
        selector: Selector<C::State>,
        priority: impl Into<Priority>,
        f: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.push(HookFn::After(Arc::new(f)), selector, priority.into())
    }

    /// Register an around callback for the events `selector` matches.
    pub fn around<F>(&mut self, selector: Selector<C::State>, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C, &mut dyn Continuation<C>) -> Result<Option<C::Output>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.around_with_priority(selector, Priority::DEFAULT, f)
    }

    /// Register an around callback with an explicit priority. Lower
    /// priority wraps outer.
    pub fn around_with_priority<F>(
        &mut self,
        selector: Selector<C::State>,
        priority: impl Into<Priority>,
        f: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&mut C, &mut dyn Continuation<C>) -> Result<Option<C::Output>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.push(HookFn::Around(Arc::new(f)), selector, priority.into())
    }

    /// Before callback scoped to one transition name.
    pub fn before_transition<F>(&mut self, name: &'static str, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.before(Selector::transition(name), f)
    }

    /// After callback scoped to one transition name.
    pub fn after_transition<F>(&mut self, name: &'static str, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.after(Selector::transition(name), f)
    }

    /// Around callback scoped to one transition name.
    pub fn around_transition<F>(&mut self, name: &'static str, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C, &mut dyn Continuation<C>) -> Result<Option<C::Output>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.around(Selector::transition(name), f)
    }

    /// Before callback for any transition leaving `state`.
    pub fn before_transition_from<F>(&mut self, state: C::State, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.before(Selector::from_state(state), f)
    }

    /// After callback for any transition leaving `state`.
    pub fn after_transition_from<F>(&mut self, state: C::State, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.after(Selector::from_state(state), f)
    }

    /// Around callback for any transition leaving `state`.
    pub fn around_transition_from<F>(&mut self, state: C::State, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C, &mut dyn Continuation<C>) -> Result<Option<C::Output>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.around(Selector::from_state(state), f)
    }

    /// Before callback for any transition entering `state`.
    pub fn before_transition_to<F>(&mut self, state: C::State, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.before(Selector::to_state(state), f)
    }

    /// After callback for any transition entering `state`.
    pub fn after_transition_to<F>(&mut self, state: C::State, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.after(Selector::to_state(state), f)
    }

    /// Around callback for any transition entering `state`.
    pub fn around_transition_to<F>(&mut self, state: C::State, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C, &mut dyn Continuation<C>) -> Result<Option<C::Output>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.around(Selector::to_state(state), f)
    }

    /// Before callback for every transition of the family.
    pub fn before_any_transition<F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.before(Selector::any(), f)
    }

    /// After callback for every transition of the family.
    pub fn after_any_transition<F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.after(Selector::any(), f)
    }

    /// Around callback for every transition of the family.
    pub fn around_any_transition<F>(&mut self, f: F) -> Result<(), ConfigError>
    where
        F: Fn(&mut C, &mut dyn Continuation<C>) -> Result<Option<C::Output>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.around(Selector::any(), f)
    }

    /// Gather the entries of `kind` matching `event`, ancestor entries
    /// first, then stable-sort by `(priority, registration order)`.
    pub fn resolve(
        &self,
        event: &TransitionEvent<'_, C::State>,
        kind: HookKind,
    ) -> Vec<Arc<HookEntry<C>>> {
        let mut matched = Vec::new();
        self.collect(event, kind, &mut matched);
        matched.sort_by_key(|entry| (entry.priority, entry.seq));
        matched
    }

    fn collect(
        &self,
        event: &TransitionEvent<'_, C::State>,
        kind: HookKind,
        out: &mut Vec<Arc<HookEntry<C>>>,
    ) {
        if let Some(parent) = &self.parent {
            parent.collect(event, kind, out);
        }
        out.extend(
            self.entries
                .iter()
                .filter(|e| e.kind() == kind && e.matches(event))
                .cloned(),
        );
    }

    pub(crate) fn resolve_simple(
        &self,
        event: &TransitionEvent<'_, C::State>,
        kind: HookKind,
    ) -> Vec<SimpleHook<C>> {
        self.resolve(event, kind)
            .iter()
            .filter_map(|e| e.simple_fn().cloned())
            .collect()
    }

    pub(crate) fn resolve_around(
        &self,
        event: &TransitionEvent<'_, C::State>,
    ) -> Vec<AroundHook<C>> {
        self.resolve(event, HookKind::Around)
            .iter()
            .filter_map(|e| e.around_fn().cloned())
            .collect()
    }
}

impl<C: Command> fmt::Debug for HookRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("entries", &self.entries.len())
            .field("inherits", &self.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;
    use crate::command::Lifecycle;
    use crate::lifecycle_states;

    lifecycle_states! {
        enum TestState {
            Initialized,
            Validating,
            Executing,
            final Succeeded,
            error Failed,
        }
    }

    struct TestCommand {
        lifecycle: Lifecycle<TestState, i32>,
    }

    impl Command for TestCommand {
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
                .transition("validate", TestState::Initialized, TestState::Validating)
                .transition("execute", TestState::Validating, TestState::Executing)
                .transition("complete", TestState::Executing, TestState::Succeeded)
                .fail_to(TestState::Failed)
                .build()
                .unwrap(),
        )
    }

    fn execute_event() -> TransitionEvent<'static, TestState> {
        TransitionEvent::new("execute", TestState::Validating, TestState::Executing)
    }

    #[test]
    fn unknown_transition_is_rejected_at_registration() {
        let mut registry: HookRegistry<TestCommand> = HookRegistry::new(table());
        let result = registry.before_transition("retry", |_| Ok(()));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownTransition { name: "retry" }
        );
    }

    #[test]
    fn unmatchable_selector_is_rejected_at_registration() {
        let mut registry: HookRegistry<TestCommand> = HookRegistry::new(table());
        // "execute" never leaves Initialized, so this could never fire.
        let selector = Selector::transition("execute").and_from(TestState::Initialized);
        let result = registry.before(selector, |_| Ok(()));
        assert!(matches!(
            result,
            Err(ConfigError::UnmatchableSelector { .. })
        ));
    }

    #[test]
    fn resolve_filters_by_kind_and_selector() {
        let mut registry: HookRegistry<TestCommand> = HookRegistry::new(table());
        registry.before_transition("execute", |_| Ok(())).unwrap();
        registry.before_transition("validate", |_| Ok(())).unwrap();
        registry.after_transition("execute", |_| Ok(())).unwrap();

        let resolved = registry.resolve(&execute_event(), HookKind::Before);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind(), HookKind::Before);
    }

    #[test]
    fn every_matching_axis_contributes_exactly_once() {
        let mut registry: HookRegistry<TestCommand> = HookRegistry::new(table());
        registry.before_transition("execute", |_| Ok(())).unwrap();
        registry
            .before_transition_from(TestState::Validating, |_| Ok(()))
            .unwrap();
        registry
            .before_transition_to(TestState::Executing, |_| Ok(()))
            .unwrap();
        registry.before_any_transition(|_| Ok(())).unwrap();

        let resolved = registry.resolve(&execute_event(), HookKind::Before);
        assert_eq!(resolved.len(), 4);
    }

    #[test]
    fn resolve_orders_by_priority_then_registration() {
        let mut registry: HookRegistry<TestCommand> = HookRegistry::new(table());
        registry
            .before_with_priority(Selector::transition("execute"), 90, |_| Ok(()))
            .unwrap();
        registry
            .before_with_priority(Selector::transition("execute"), 10, |_| Ok(()))
            .unwrap();
        registry.before_transition("execute", |_| Ok(())).unwrap();

        let resolved = registry.resolve(&execute_event(), HookKind::Before);
        let priorities: Vec<i32> = resolved.iter().map(|e| e.priority().value()).collect();
        assert_eq!(priorities, vec![10, 50, 90]);
    }

    #[test]
    fn equal_priority_ties_break_by_registration_order() {
        let mut registry: HookRegistry<TestCommand> = HookRegistry::new(table());
        registry.before_transition("execute", |_| Ok(())).unwrap();
        registry.before_transition("execute", |_| Ok(())).unwrap();

        let resolved = registry.resolve(&execute_event(), HookKind::Before);
        assert_eq!(resolved.len(), 2);
        assert!(resolved[0].seq < resolved[1].seq);
    }

    #[test]
    fn child_registry_sees_ancestor_entries() {
        let mut base: HookRegistry<TestCommand> = HookRegistry::new(table());
        base.before_any_transition(|_| Ok(())).unwrap();

        let mut child = HookRegistry::extending(Arc::new(base));
        child.before_transition("execute", |_| Ok(())).unwrap();

        let resolved = child.resolve(&execute_event(), HookKind::Before);
        assert_eq!(resolved.len(), 2);
        // Ancestor registered first, so it carries the smaller sequence.
        assert!(resolved[0].seq < resolved[1].seq);
    }

    #[test]
    fn subclass_priority_can_outrank_ancestor_entries() {
        let mut base: HookRegistry<TestCommand> = HookRegistry::new(table());
        base.before_any_transition(|_| Ok(())).unwrap();

        let mut child = HookRegistry::extending(Arc::new(base));
        child
            .before_with_priority(Selector::transition("execute"), Priority::EARLY, |_| Ok(()))
            .unwrap();

        let resolved = child.resolve(&execute_event(), HookKind::Before);
        assert_eq!(resolved[0].priority(), Priority::EARLY);
    }
}
