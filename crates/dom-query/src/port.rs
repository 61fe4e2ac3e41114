use async_trait::async_trait;

use crate::errors::DomError;
use crate::keys::KeyInput;
use crate::types::{EditCommand, ElementHandle, PointerGesture, QuerySelector, Rect};

/// Element-level capability set of a page.
///
/// Everything above this trait (resolution, primitives, controllers) is
/// written against it, so the same choreography drives a real tab through
/// [`crate::ScriptDomPort`] or an in-memory `memory::FixtureDom`.
#[async_trait]
pub trait DomPort: Send + Sync {
    /// Matches of `selector` in document order, searched below `scope` when
    /// given, else from the document root.
    async fn query_all(
        &self,
        selector: &QuerySelector,
        scope: Option<&ElementHandle>,
    ) -> Result<Vec<ElementHandle>, DomError>;

    async fn text_content(&self, element: &ElementHandle) -> Result<String, DomError>;

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DomError>;

    /// `false` when the computed `pointer-events` is `none`.
    async fn pointer_events_enabled(&self, element: &ElementHandle) -> Result<bool, DomError>;

    async fn dispatch_pointer(
        &self,
        element: &ElementHandle,
        gesture: PointerGesture,
    ) -> Result<(), DomError>;

    async fn computed_style(
        &self,
        element: &ElementHandle,
        property: &str,
    ) -> Result<String, DomError>;

    /// Inline style value, empty when unset.
    async fn inline_style(&self, element: &ElementHandle, property: &str)
        -> Result<String, DomError>;

    /// Set an inline style property; an empty value removes it.
    async fn set_inline_style(
        &self,
        element: &ElementHandle,
        property: &str,
        value: &str,
    ) -> Result<(), DomError>;

    async fn bounding_rect(&self, element: &ElementHandle) -> Result<Rect, DomError>;

    async fn viewport_height(&self) -> Result<f64, DomError>;

    /// Ask the browser to scroll the element to the vertical center.
    async fn scroll_to_center(&self, element: &ElementHandle) -> Result<(), DomError>;

    /// Focus `element` (when given) and replay `keys` on the focused element.
    async fn send_keys(
        &self,
        element: Option<&ElementHandle>,
        keys: &[KeyInput],
    ) -> Result<(), DomError>;

    async fn exec_edit_command(&self, command: EditCommand) -> Result<(), DomError>;

    /// Fire `dragenter`, `dragover` and `drop` carrying `text` as plain text.
    async fn drop_text(&self, element: &ElementHandle, text: &str) -> Result<(), DomError>;

    /// Transient cosmetic marker at viewport coordinates.
    async fn show_ripple(&self, x: f64, y: f64, duration_ms: u64) -> Result<(), DomError>;
}
