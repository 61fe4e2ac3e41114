//! Error types for controllers

use dom_query::DomQueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("unknown app '{app}'")]
    UnknownApp { app: String },

    #[error("invalid profile for '{app}': {source}")]
    InvalidProfile {
        app: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read profile override {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A query the controller relies on is missing from its profile
    #[error("no query named '{name}' in the '{app}' profile")]
    MissingQuery { app: String, name: String },

    #[error(transparent)]
    Selectors(#[from] DomQueryError),

    /// An external collaborator (schema source, sandbox) failed
    #[error("{service} failed: {message}")]
    Collaborator {
        service: &'static str,
        message: String,
    },
}

impl ControllerError {
    pub fn collaborator(service: &'static str, message: impl Into<String>) -> Self {
        ControllerError::Collaborator {
            service,
            message: message.into(),
        }
    }
}
