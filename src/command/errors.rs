//! Recorded runtime errors.
//!
//! Domain-level failures are values, not panics: callbacks and core
//! actions either return a [`RuntimeError`] or record one through the
//! instance's failure primitive, and the engine routes the instance to
//! its failure state.

use std::fmt;
use thiserror::Error;

/// A domain-level failure recorded against a command instance.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RuntimeError {
    message: String,
}

impl RuntimeError {
    /// Create a runtime error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The recorded message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for RuntimeError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for RuntimeError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Accumulated runtime errors for one command instance.
///
/// The log only grows during a dispatch; a non-empty log is what routes
/// the instance to the failure state.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog {
    errors: Vec<RuntimeError>,
}

impl ErrorLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn push(&mut self, error: RuntimeError) {
        self.errors.push(error);
    }

    /// Whether any error has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over recorded errors, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RuntimeError> {
        self.errors.iter()
    }

    /// All recorded messages, oldest first.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(RuntimeError::message).collect()
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_log_is_empty() {
        let log = ErrorLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn push_accumulates_in_order() {
        let mut log = ErrorLog::new();
        log.push(RuntimeError::new("name is blank"));
        log.push(RuntimeError::new("email is taken"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages(), vec!["name is blank", "email is taken"]);
    }

    #[test]
    fn display_joins_messages() {
        let mut log = ErrorLog::new();
        log.push("first".into());
        log.push("second".into());
        assert_eq!(log.to_string(), "first; second");
    }

    #[test]
    fn runtime_error_converts_from_strings() {
        let from_str: RuntimeError = "boom".into();
        let from_string: RuntimeError = String::from("boom").into();
        assert_eq!(from_str, from_string);
    }
}
