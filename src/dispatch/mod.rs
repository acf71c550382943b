//! Transition dispatch.
//!
//! Given a transition event and a core action, the dispatcher resolves
//! the matching callbacks, orders them, and executes the full
//! before → around(action) → commit → after sequence, returning either a
//! completed attempt or an abort for the caller to route to the failure
//! state.

mod continuation;
mod dispatcher;

pub use continuation::{Continuation, CoreAction};
pub use dispatcher::{DispatchError, Dispatched, Dispatcher};
