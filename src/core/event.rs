//! Transition events.

use super::state::State;

/// One attempted state change, built fresh per dispatch and discarded
/// when dispatch completes.
///
/// Selector matching consults only this `(transition, from, to)` triple;
/// no other instance state participates in the decision.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionEvent<'a, S: State> {
    /// Name of the attempted transition.
    pub transition: &'a str,
    /// State the instance is leaving.
    pub from: S,
    /// State the instance would enter.
    pub to: S,
}

impl<'a, S: State> TransitionEvent<'a, S> {
    /// Build an event for one transition attempt.
    pub fn new(transition: &'a str, from: S, to: S) -> Self {
        Self {
            transition,
            from,
            to,
        }
    }
}
