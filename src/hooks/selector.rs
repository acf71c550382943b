//! Selectors: which events a registered callback applies to.

use crate::core::{State, TransitionEvent};
use std::fmt;

/// Matching criteria attached to a registered callback.
///
/// Three optional axes (transition name, source state, destination
/// state) where `None` means unconstrained. Matching is a pure
/// structural comparison against the event's `(transition, from, to)`
/// triple; there is no selector-specificity precedence.
///
/// # Example
///
/// ```rust
/// use cadence::hooks::Selector;
/// use cadence::core::TransitionEvent;
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
/// let event = TransitionEvent::new(
///     "validate",
///     CommandState::Initialized,
///     CommandState::Validating,
/// );
///
/// assert!(Selector::any().matches(&event));
/// assert!(Selector::transition("validate").matches(&event));
/// assert!(Selector::from_state(CommandState::Initialized).matches(&event));
/// assert!(!Selector::to_state(CommandState::Succeeded).matches(&event));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Selector<S: State> {
    /// Constrain to one transition name, or `None` for any.
    pub transition: Option<&'static str>,
    /// Constrain to transitions leaving this state, or `None` for any.
    pub from: Option<S>,
    /// Constrain to transitions entering this state, or `None` for any.
    pub to: Option<S>,
}

impl<S: State> Default for Selector<S> {
    fn default() -> Self {
        Self::any()
    }
}

impl<S: State> Selector<S> {
    /// Matches every transition of the family.
    pub fn any() -> Self {
        Self {
            transition: None,
            from: None,
            to: None,
        }
    }

    /// Matches transitions with this name.
    pub fn transition(name: &'static str) -> Self {
        Self {
            transition: Some(name),
            ..Self::any()
        }
    }

    /// Matches any transition leaving this state.
    pub fn from_state(state: S) -> Self {
        Self {
            from: Some(state),
            ..Self::any()
        }
    }

    /// Matches any transition entering this state.
    pub fn to_state(state: S) -> Self {
        Self {
            to: Some(state),
            ..Self::any()
        }
    }

    /// Additionally constrain the source state.
    pub fn and_from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Additionally constrain the destination state.
    pub fn and_to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Check this selector against one event. Pure; consults only the
    /// event triple.
    pub fn matches(&self, event: &TransitionEvent<'_, S>) -> bool {
        self.transition.is_none_or(|name| name == event.transition)
            && self.from.as_ref().is_none_or(|from| *from == event.from)
            && self.to.as_ref().is_none_or(|to| *to == event.to)
    }
}

impl<S: State> fmt::Display for Selector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transition={}, from={}, to={}",
            self.transition.unwrap_or("*"),
            self.from.as_ref().map_or("*", State::name),
            self.to.as_ref().map_or("*", State::name),
        )
    }
}
