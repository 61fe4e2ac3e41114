//! Error types for dispatch

use thiserror::Error;

/// Contract violations between the planner and the active controller.
///
/// Failures inside an action body are not errors at this level; they come
/// back as failed [`crate::ActionRecord`]s.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown action '{action}' for app '{app}'")]
    UnknownAction { action: String, app: String },

    #[error("no active controller")]
    NoActiveController,

    /// A newer request replaced this one while it waited its turn
    #[error("superseded by a newer request")]
    Superseded,
}
