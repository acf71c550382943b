//! Registration-time configuration errors.

use thiserror::Error;

/// Errors raised when a callback registration is malformed.
///
/// Registration happens during startup, so these surface immediately
/// instead of waiting for a dispatch that would never match.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Selector names undeclared transition '{name}'")]
    UnknownTransition { name: &'static str },

    #[error("Selector ({selector}) matches no declared edge of the table")]
    UnmatchableSelector { selector: String },
}
