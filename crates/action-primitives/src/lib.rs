//! Interaction primitives and choreography
//!
//! This crate drives uncooperative third-party UIs through a [`dom_query::DomPort`]:
//! - Primitives: click, double-click, scroll into view, type, select-all,
//!   drag-and-drop text, highlight
//! - Choreography: set a widget's value, ripple feedback, wait for a running
//!   query to finish
//! - A target that does not resolve is skipped, never an error
//!
//! All state shared between invocations (timings, selector map, the
//! highlighted element) lives in an [`InteractionSession`].

/// Unwrap a port result or bail out of the primitive with a skip outcome.
macro_rules! try_port {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => return Ok($crate::primitives::port_failure(err)),
        }
    };
}

mod choreography;
pub mod errors;
mod primitives;
mod session;
pub mod types;

pub use errors::*;
pub use primitives::*;
pub use session::*;
pub use types::*;
