//! Registered callback entries.
//!
//! A callback's kind is a closed tagged union: before and after
//! callbacks receive the instance alone, while around callbacks also
//! receive the continuation for the remaining chain. The function shape
//! is therefore checked at registration time by the type system.

use super::selector::Selector;
use crate::command::{Command, RuntimeError};
use crate::core::TransitionEvent;
use crate::dispatch::Continuation;
use std::fmt;
use std::sync::Arc;

/// Execution/wrapping order key. Lower values run earlier among before
/// and after callbacks and wrap outer among around callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(i32);

impl Priority {
    /// The priority assigned when none is given.
    pub const DEFAULT: Priority = Priority(50);

    /// Runs before default-priority callbacks / wraps outside them.
    pub const EARLY: Priority = Priority(10);

    /// Runs after default-priority callbacks / wraps inside them.
    pub const LATE: Priority = Priority(90);

    /// Create a priority from a raw value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// The raw ordering value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three callback kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    /// Runs before the core action; may abort the attempt.
    Before,
    /// Runs after the commit; observes side effects only.
    After,
    /// Wraps the remaining chain via a continuation; may transform the
    /// provisional result or suppress inner execution.
    Around,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Before => write!(f, "before"),
            HookKind::After => write!(f, "after"),
            HookKind::Around => write!(f, "around"),
        }
    }
}

/// Shape of a before or after callback.
pub type SimpleHook<C> = Arc<dyn Fn(&mut C) -> Result<(), RuntimeError> + Send + Sync>;

/// Shape of an around callback: instance plus the continuation for the
/// remaining chain, returning the (possibly transformed) provisional
/// result.
pub type AroundHook<C> = Arc<
    dyn Fn(
            &mut C,
            &mut dyn Continuation<C>,
        ) -> Result<Option<<C as Command>::Output>, RuntimeError>
        + Send
        + Sync,
>;

pub(crate) enum HookFn<C: Command> {
    Before(SimpleHook<C>),
    After(SimpleHook<C>),
    Around(AroundHook<C>),
}

/// One registered callback: the function, its selector, its priority,
/// and the registration sequence number used as the stable tie-break.
pub struct HookEntry<C: Command> {
    pub(crate) callback: HookFn<C>,
    pub(crate) selector: Selector<C::State>,
    pub(crate) priority: Priority,
    pub(crate) seq: u64,
}

impl<C: Command> HookEntry<C> {
    /// The callback's kind.
    pub fn kind(&self) -> HookKind {
        match self.callback {
            HookFn::Before(_) => HookKind::Before,
            HookFn::After(_) => HookKind::After,
            HookFn::Around(_) => HookKind::Around,
        }
    }

    /// The selector this entry was registered with.
    pub fn selector(&self) -> &Selector<C::State> {
        &self.selector
    }

    /// The entry's priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The monotonically increasing counter value assigned at
    /// registration, used as the stable tie-break within equal priority.
    pub fn registration_order(&self) -> u64 {
        self.seq
    }

    /// Check whether this entry applies to an event.
    pub fn matches(&self, event: &TransitionEvent<'_, C::State>) -> bool {
        self.selector.matches(event)
    }

    pub(crate) fn simple_fn(&self) -> Option<&SimpleHook<C>> {
        match &self.callback {
            HookFn::Before(f) | HookFn::After(f) => Some(f),
            HookFn::Around(_) => None,
        }
    }

    pub(crate) fn around_fn(&self) -> Option<&AroundHook<C>> {
        match &self.callback {
            HookFn::Around(f) => Some(f),
            _ => None,
        }
    }
}

impl<C: Command> fmt::Debug for HookEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEntry")
            .field("kind", &self.kind())
            .field("selector", &self.selector)
            .field("priority", &self.priority)
            .field("seq", &self.seq)
            .finish()
    }
}
