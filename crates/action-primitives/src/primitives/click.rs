//! Click primitive - pointer sequence on one resolved element

use dom_query::PointerGesture;
use tracing::{debug, info};

use crate::{
    errors::InteractionError,
    session::InteractionSession,
    types::{Outcome, SkipReason, Target},
};

/// Execute click primitive
///
/// Steps:
/// 1. Resolve the target's selector and its `index`-th match
/// 2. Skip elements with pointer events disabled
/// 3. Dispatch the pointer sequence
/// 4. Give the host UI time to react
pub(crate) async fn execute_click(
    session: &InteractionSession,
    target: Target<'_>,
    index: usize,
    gesture: PointerGesture,
) -> Result<Outcome, InteractionError> {
    let selector = session.selector_for(target)?;

    info!(
        target_name = %target,
        selector = %selector,
        index,
        gesture = ?gesture,
        "Executing click primitive"
    );

    // 1. Resolve
    let Some(element) = session.element_at(&selector, index).await else {
        return Ok(Outcome::not_found());
    };

    // 2. Interactability
    let port = session.port();
    if !try_port!(port.pointer_events_enabled(&element).await) {
        debug!(element = %element, "pointer events disabled; skipping click");
        return Ok(Outcome::Skipped(SkipReason::NotInteractable));
    }

    // 3. Dispatch
    try_port!(port.dispatch_pointer(&element, gesture).await);

    // 4. Settle
    session.settle().await;

    debug!(element = %element, gesture = ?gesture, "Click completed");
    Ok(Outcome::Performed)
}
