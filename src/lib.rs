//! Cadence: a lifecycle-hook dispatch engine for command state machines
//!
//! Commands move through a fixed state machine (canonically
//! initialized → validating → executing → succeeded/failed); external
//! code attaches callbacks that run before, after, or around specific
//! transitions, specific states, or any transition at all. Cadence
//! collects, orders, and executes those callbacks deterministically,
//! composing around callbacks into a nested continuation chain that can
//! observe and transform the transition's result.
//!
//! # Core Concepts
//!
//! - **State**: type-safe lifecycle positions via the `State` trait
//! - **Transition table**: the closed set of legal edges per family
//! - **Hooks**: before/after/around callbacks selected by transition
//!   name, source state, destination state, or unconstrained, ordered by
//!   `(priority, registration order)`
//! - **Runner**: the public `validate()`/`execute()` surface that drives
//!   instances and routes recorded failures to the failure state
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cadence::builder::TableBuilder;
//! use cadence::command::{Command, Lifecycle, Outcome, Runner, RuntimeError};
//! use cadence::hooks::HookRegistry;
//! use cadence::lifecycle_states;
//!
//! lifecycle_states! {
//!     pub enum CommandState {
//!         Initialized,
//!         Validating,
//!         Executing,
//!         final Succeeded,
//!         error Failed,
//!     }
//! }
//!
//! struct Greet {
//!     lifecycle: Lifecycle<CommandState, String>,
//!     name: String,
//! }
//!
//! impl Command for Greet {
//!     type State = CommandState;
//!     type Output = String;
//!
//!     fn lifecycle(&self) -> &Lifecycle<CommandState, String> {
//!         &self.lifecycle
//!     }
//!
//!     fn lifecycle_mut(&mut self) -> &mut Lifecycle<CommandState, String> {
//!         &mut self.lifecycle
//!     }
//!
//!     fn validate(&mut self) -> Result<(), RuntimeError> {
//!         if self.name.is_empty() {
//!             self.add_runtime_error("name is blank");
//!         }
//!         Ok(())
//!     }
//!
//!     fn perform(&mut self) -> Result<String, RuntimeError> {
//!         Ok(format!("hello, {}", self.name))
//!     }
//! }
//!
//! let table = Arc::new(
//!     TableBuilder::new()
//!         .transition("validate", CommandState::Initialized, CommandState::Validating)
//!         .transition("execute", CommandState::Validating, CommandState::Executing)
//!         .transition("complete", CommandState::Executing, CommandState::Succeeded)
//!         .fail_to(CommandState::Failed)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut registry: HookRegistry<Greet> = HookRegistry::new(table);
//! registry
//!     .around_transition("execute", |cmd, next| {
//!         let value = next.proceed(cmd)?;
//!         Ok(value.map(|greeting| greeting.to_uppercase()))
//!     })
//!     .unwrap();
//!
//! let runner = Runner::new(Arc::new(registry));
//! let mut cmd = Greet {
//!     lifecycle: Lifecycle::new(CommandState::Initialized),
//!     name: "ada".into(),
//! };
//!
//! assert_eq!(runner.execute(&mut cmd).unwrap(), Outcome::Succeeded);
//! assert_eq!(cmd.result().map(String::as_str), Some("HELLO, ADA"));
//! ```

pub mod builder;
pub mod command;
pub mod core;
pub mod dispatch;
pub mod hooks;

// Re-export commonly used types
pub use builder::{BuildError, TableBuilder};
pub use command::{Command, ErrorLog, Lifecycle, Outcome, Runner, RuntimeError};
pub use core::{State, TransitionEvent, TransitionTable};
pub use dispatch::{Continuation, DispatchError, Dispatcher};
pub use hooks::{ConfigError, HookKind, HookRegistry, Priority, RegistryStore, Selector};
