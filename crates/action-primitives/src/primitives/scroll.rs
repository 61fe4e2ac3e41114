//! Scroll primitive - bring an element into view inside virtualized containers

use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    errors::InteractionError,
    session::InteractionSession,
    types::{Outcome, Target},
};

/// Execute scroll_into_view primitive
///
/// A single scroll request is unreliable in animated or virtualized scroll
/// containers, so the element is scrolled and re-measured until it stops
/// moving.
///
/// Steps:
/// 1. Resolve the target
/// 2. Force `display: block` on hidden elements
/// 3. Up to `scroll_attempts` times: measure, scroll to center, wait, measure
///    again; stop when the element started inside the viewport or moved less
///    than `scroll_settle_px`
pub(crate) async fn execute_scroll_into_view(
    session: &InteractionSession,
    target: Target<'_>,
    index: usize,
) -> Result<Outcome, InteractionError> {
    let selector = session.selector_for(target)?;
    let timings = session.timings();

    info!(
        target_name = %target,
        selector = %selector,
        index,
        max_attempts = timings.scroll_attempts,
        "Executing scroll primitive"
    );

    // 1. Resolve
    let Some(element) = session.element_at(&selector, index).await else {
        return Ok(Outcome::not_found());
    };
    let port = session.port();

    // 2. Visibility precondition
    let display = try_port!(port.computed_style(&element, "display").await);
    if display.trim() == "none" {
        debug!(element = %element, "forcing display:block before scrolling");
        try_port!(port.set_inline_style(&element, "display", "block").await);
    }

    // 3. Convergence loop
    let viewport_height = try_port!(port.viewport_height().await);
    for attempt in 0..timings.scroll_attempts {
        let before = try_port!(port.bounding_rect(&element).await).top();
        if attempt == 0 && (0.0..viewport_height).contains(&before) {
            debug!(element = %element, top = before, "already inside the viewport");
            break;
        }

        try_port!(port.scroll_to_center(&element).await);
        sleep(timings.scroll_interval()).await;

        let after = try_port!(port.bounding_rect(&element).await).top();
        if (after - before).abs() < timings.scroll_settle_px {
            debug!(element = %element, attempt, top = after, "scroll converged");
            break;
        }
        debug!(element = %element, attempt, before, after, "element still moving");
    }

    Ok(Outcome::Performed)
}
