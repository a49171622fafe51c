//! Shared primitives used across SpyGlass crates.

use core::fmt;

/// Result alias used across the workspace.
pub type SpyResult<T> = Result<T, SpyError>;

/// Error carried between the engine crates and the viewer shell.
///
/// The `code` is a stable dotted identifier (`"layout.viewport_invalid"`)
/// meant for matching in callers and tests; the message is for people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpyError {
    pub code: &'static str,
    pub message: String,
}

impl SpyError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for SpyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for SpyError {}
