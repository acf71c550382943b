//! Continuation-passing composition of around callbacks.
//!
//! The sorted around list is folded right-to-left: the last entry wraps
//! the core action directly, the first entry becomes the outermost
//! layer. Each layer receives the continuation for everything inside it
//! and must invoke it at most once; composition is plain synchronous
//! nested invocation, no suspension machinery.

use crate::command::{Command, RuntimeError};
use crate::hooks::AroundHook;
use std::cell::Cell;

/// The continuation handed to an around callback.
///
/// Invoking [`proceed`](Self::proceed) runs the remaining chain (inner
/// around layers, then the core action) and yields its provisional
/// result. Not invoking it is a deliberate short-circuit: the callback's
/// own return value stands in for the inner layers. Invoking it twice is
/// a protocol violation the dispatcher surfaces even when the callback
/// swallows the error it gets back.
pub trait Continuation<C: Command> {
    /// Run the remaining chain and return its provisional result.
    fn proceed(&mut self, cmd: &mut C) -> Result<Option<C::Output>, RuntimeError>;
}

/// The core action a dispatch wraps: the innermost continuation of the
/// around chain.
pub type CoreAction<'a, C> =
    &'a mut dyn FnMut(&mut C) -> Result<Option<<C as Command>::Output>, RuntimeError>;

struct ChainLink<'a, C: Command> {
    rest: &'a [AroundHook<C>],
    action: CoreAction<'a, C>,
    violated: &'a Cell<bool>,
    calls: u32,
}

impl<C: Command> Continuation<C> for ChainLink<'_, C> {
    fn proceed(&mut self, cmd: &mut C) -> Result<Option<C::Output>, RuntimeError> {
        self.calls += 1;
        if self.calls > 1 {
            self.violated.set(true);
            return Err(RuntimeError::new(
                "around continuation invoked more than once",
            ));
        }
        run_chain(cmd, self.rest, self.action, self.violated)
    }
}

pub(crate) fn run_chain<C: Command>(
    cmd: &mut C,
    chain: &[AroundHook<C>],
    action: CoreAction<'_, C>,
    violated: &Cell<bool>,
) -> Result<Option<C::Output>, RuntimeError> {
    match chain.split_first() {
        None => action(cmd),
        Some((outer, rest)) => {
            let mut link = ChainLink {
                rest,
                action,
                violated,
                calls: 0,
            };
            outer(cmd, &mut link)
        }
    }
}
