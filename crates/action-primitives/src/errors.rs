//! Error types for action primitives

use thiserror::Error;

/// Failures a primitive reports to its caller.
///
/// DOM-level conditions (no match, element not interactable, port failure)
/// are not errors; they come back as [`crate::Outcome::Skipped`]. Waits are
/// the exception for transport failures, since absence is their signal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// A logical element name is missing from the selector map
    #[error("no selector named '{name}' in the selector map")]
    UnknownSelector { name: String },

    /// The bounded wait gave up while the indicator was still present
    #[error("'{selector}' still present after {waited_ms}ms")]
    DeadlineExceeded { selector: String, waited_ms: u64 },

    /// The page could not be reached while its state was being read
    #[error("lost the page while checking '{selector}': {message}")]
    Port { selector: String, message: String },
}

impl InteractionError {
    /// Configuration drift rather than a transient page condition.
    pub fn is_configuration(&self) -> bool {
        matches!(self, InteractionError::UnknownSelector { .. })
    }
}
