//! Interaction primitives
//!
//! Atomic simulated-user operations:
//! 1. click / double_click - pointer sequence on an interactable element
//! 2. scroll_into_view - bounded convergence loop toward the viewport center
//! 3. type_text - keyboard input with `{Token}` special keys
//! 4. select_all_text - edit commands on whatever holds focus
//! 5. drag_and_drop_text - synthetic plain-text drop
//! 6. highlight / clear_highlight - toggling inline style on one element

mod click;
mod drag_drop;
mod highlight;
mod scroll;
mod select;
mod type_text;

pub(crate) use click::execute_click;
pub(crate) use drag_drop::execute_drag_and_drop_text;
pub(crate) use highlight::{execute_clear_highlight, execute_highlight};
pub(crate) use scroll::execute_scroll_into_view;
pub(crate) use select::execute_select_all_text;
pub(crate) use type_text::execute_type_text;

use async_trait::async_trait;
use dom_query::{DomError, PointerGesture};
use tracing::{debug, warn};

use crate::{
    errors::InteractionError,
    session::InteractionSession,
    types::{HighlightStyle, Outcome, SkipReason, Target},
};

/// Interaction primitives trait
///
/// Every method resolves its target afresh. A target that does not resolve,
/// an element that is not interactable and a failing page all come back as
/// [`Outcome::Skipped`]; only an unknown logical name is an error.
#[async_trait]
pub trait InteractionPrimitives: Send + Sync {
    async fn click(&self, target: Target<'_>, index: usize) -> Result<Outcome, InteractionError>;

    async fn double_click(
        &self,
        target: Target<'_>,
        index: usize,
    ) -> Result<Outcome, InteractionError>;

    /// Scroll until the element sits still, at most `scroll_attempts` times.
    async fn scroll_into_view(
        &self,
        target: Target<'_>,
        index: usize,
    ) -> Result<Outcome, InteractionError>;

    async fn type_text(
        &self,
        target: Target<'_>,
        text: &str,
        index: usize,
    ) -> Result<Outcome, InteractionError>;

    /// Select everything in the focused editable surface, then optionally delete it.
    async fn select_all_text(&self, should_delete: bool) -> Result<Outcome, InteractionError>;

    async fn drag_and_drop_text(
        &self,
        target: Target<'_>,
        value: &str,
        index: usize,
    ) -> Result<Outcome, InteractionError>;

    /// Toggle the highlight style on an element; `None` means a red border.
    async fn highlight(
        &self,
        target: Target<'_>,
        index: usize,
        style: Option<&HighlightStyle>,
    ) -> Result<Outcome, InteractionError>;

    /// Restore whatever element is currently highlighted.
    async fn clear_highlight(&self) -> Result<Outcome, InteractionError>;
}

#[async_trait]
impl InteractionPrimitives for InteractionSession {
    async fn click(&self, target: Target<'_>, index: usize) -> Result<Outcome, InteractionError> {
        execute_click(self, target, index, PointerGesture::Click).await
    }

    async fn double_click(
        &self,
        target: Target<'_>,
        index: usize,
    ) -> Result<Outcome, InteractionError> {
        execute_click(self, target, index, PointerGesture::DoubleClick).await
    }

    async fn scroll_into_view(
        &self,
        target: Target<'_>,
        index: usize,
    ) -> Result<Outcome, InteractionError> {
        execute_scroll_into_view(self, target, index).await
    }

    async fn type_text(
        &self,
        target: Target<'_>,
        text: &str,
        index: usize,
    ) -> Result<Outcome, InteractionError> {
        execute_type_text(self, target, text, index).await
    }

    async fn select_all_text(&self, should_delete: bool) -> Result<Outcome, InteractionError> {
        execute_select_all_text(self, should_delete).await
    }

    async fn drag_and_drop_text(
        &self,
        target: Target<'_>,
        value: &str,
        index: usize,
    ) -> Result<Outcome, InteractionError> {
        execute_drag_and_drop_text(self, target, value, index).await
    }

    async fn highlight(
        &self,
        target: Target<'_>,
        index: usize,
        style: Option<&HighlightStyle>,
    ) -> Result<Outcome, InteractionError> {
        execute_highlight(self, target, index, style).await
    }

    async fn clear_highlight(&self) -> Result<Outcome, InteractionError> {
        execute_clear_highlight(self).await
    }
}

/// Map a port failure in the middle of a primitive to a skip.
pub(crate) fn port_failure(err: DomError) -> Outcome {
    match err {
        DomError::Detached(element) => {
            debug!(element = %element, "element left the document mid-interaction");
            Outcome::not_found()
        }
        other => {
            warn!(error = %other, "page port failure; skipping interaction");
            Outcome::Skipped(SkipReason::PortError(other.to_string()))
        }
    }
}
