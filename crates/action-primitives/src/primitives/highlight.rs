//! Highlight primitive - toggle a visual style on one element at a time

use dom_query::DomPort;
use tracing::{debug, info};

use crate::{
    errors::InteractionError,
    session::{HighlightState, InteractionSession},
    types::{HighlightStyle, Outcome, Target},
};

/// Execute highlight primitive
///
/// Steps:
/// 1. Resolve the target (a miss leaves the current highlight alone)
/// 2. Restore the currently highlighted element, if any
/// 3. Stop there when it was the same element (toggle off)
/// 4. Record the element's current inline values, then apply `style`
pub(crate) async fn execute_highlight(
    session: &InteractionSession,
    target: Target<'_>,
    index: usize,
    style: Option<&HighlightStyle>,
) -> Result<Outcome, InteractionError> {
    let selector = session.selector_for(target)?;

    info!(
        target_name = %target,
        selector = %selector,
        index,
        "Executing highlight primitive"
    );

    // 1. Resolve
    let Some(element) = session.element_at(&selector, index).await else {
        return Ok(Outcome::not_found());
    };
    let port = session.port();
    let mut slot = session.highlighted.lock().await;

    // 2-3. Restore previous
    if let Some(previous) = slot.take() {
        restore(port.as_ref(), &previous).await;
        if previous.element == element {
            debug!(element = %element, "highlight toggled off");
            return Ok(Outcome::Performed);
        }
    }

    // 4. Apply
    let default_style = HighlightStyle::default();
    let style = style.unwrap_or(&default_style);
    let mut previous = Vec::new();
    for (property, _) in style.iter() {
        let value = try_port!(port.inline_style(&element, property).await);
        previous.push((property.to_string(), value));
    }
    *slot = Some(HighlightState {
        element: element.clone(),
        previous,
    });
    for (property, value) in style.iter() {
        try_port!(port.set_inline_style(&element, property, value).await);
    }

    debug!(element = %element, "highlight applied");
    Ok(Outcome::Performed)
}

/// Restore the highlighted element, if any.
pub(crate) async fn execute_clear_highlight(
    session: &InteractionSession,
) -> Result<Outcome, InteractionError> {
    let Some(previous) = session.highlighted.lock().await.take() else {
        return Ok(Outcome::not_found());
    };
    info!(element = %previous.element, "Clearing highlight");
    restore(session.port().as_ref(), &previous).await;
    Ok(Outcome::Performed)
}

async fn restore(port: &dyn DomPort, state: &HighlightState) {
    for (property, value) in &state.previous {
        if let Err(err) = port.set_inline_style(&state.element, property, value).await {
            // Usually the element is gone; nothing left to restore.
            debug!(element = %state.element, error = %err, "could not restore highlight");
            return;
        }
    }
}
