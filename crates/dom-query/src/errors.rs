//! Error types for selector resolution

use cdp_adapter::AdapterError;
use thiserror::Error;

use crate::types::ElementHandle;

/// Failures reported by a [`crate::DomPort`] implementation.
///
/// These never escape the resolution engine: a failed lookup is logged and
/// treated like a miss.
#[derive(Debug, Error, Clone)]
pub enum DomError {
    /// The handle no longer refers to an element in the document
    #[error("element detached: {0}")]
    Detached(ElementHandle),

    /// The selector expression could not be evaluated
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// The page replied with something the port did not expect
    #[error("unexpected page reply: {0}")]
    Protocol(String),

    /// Browser transport failure
    #[error(transparent)]
    Runtime(#[from] AdapterError),
}

/// Configuration problems with selector maps.
#[derive(Debug, Error)]
pub enum DomQueryError {
    #[error("no selector named '{name}' in the selector map")]
    UnknownSelector { name: String },

    #[error("failed to parse selector map: {0}")]
    InvalidMap(#[from] serde_yaml::Error),

    #[error("failed to read selector map: {0}")]
    Io(#[from] std::io::Error),
}
