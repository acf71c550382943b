//! Static transition tables.
//!
//! A table is the closed set of legal `(name, source, destination)` edges
//! for one command family, plus the designated failure state that aborted
//! attempts redirect to. Tables are declared once, at startup, through
//! [`TableBuilder`](crate::builder::TableBuilder) and never extended at
//! runtime.

use super::state::State;

/// One legal directed edge in a transition table.
///
/// Edges may share a name as long as their `(from, to)` pairs differ;
/// `(from, name)` is the unique lookup key.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionDef<S: State> {
    /// Transition name, e.g. `"execute"`.
    pub name: &'static str,
    /// Source state the edge leaves.
    pub from: S,
    /// Destination state the edge enters.
    pub to: S,
}

/// The static transition table for a command family.
///
/// Lookup is pure: [`destination`](Self::destination) answers the
/// `can_transition` question from the `(source, name)` pair alone.
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State> {
    edges: Vec<TransitionDef<S>>,
    failure_state: S,
}

impl<S: State> TransitionTable<S> {
    pub(crate) fn new(edges: Vec<TransitionDef<S>>, failure_state: S) -> Self {
        Self {
            edges,
            failure_state,
        }
    }

    /// Look up the destination for `(source, name)`.
    ///
    /// Returns `None` when the edge is not in the table; the caller is
    /// responsible for surfacing that as an invalid-transition error.
    pub fn destination(&self, from: &S, name: &str) -> Option<S> {
        self.edges
            .iter()
            .find(|e| e.name == name && e.from == *from)
            .map(|e| e.to.clone())
    }

    /// Check whether any edge carries this transition name.
    pub fn declares(&self, name: &str) -> bool {
        self.edges.iter().any(|e| e.name == name)
    }

    /// Check whether a selector's `(name, from, to)` constraints could
    /// ever match a declared edge.
    pub fn declares_matching(
        &self,
        name: Option<&str>,
        from: Option<&S>,
        to: Option<&S>,
    ) -> bool {
        self.edges.iter().any(|e| {
            name.is_none_or(|n| n == e.name)
                && from.is_none_or(|f| *f == e.from)
                && to.is_none_or(|t| *t == e.to)
        })
    }

    /// The state aborted attempts redirect to.
    pub fn failure_state(&self) -> &S {
        &self.failure_state
    }

    /// All declared edges, in declaration order.
    pub fn edges(&self) -> &[TransitionDef<S>] {
        &self.edges
    }

    /// Check whether a state has at least one outgoing edge.
    pub fn has_outgoing(&self, state: &S) -> bool {
        self.edges.iter().any(|e| e.from == *state)
    }
}
