//! Drag-and-drop primitive - synthetic plain-text drop onto an element
//!
//! Custom code editors tend to ignore scripted value changes and key events
//! but accept native drops, so bulk text goes in this way.

use tracing::info;

use crate::{
    errors::InteractionError,
    session::InteractionSession,
    types::{Outcome, Target},
};

pub(crate) async fn execute_drag_and_drop_text(
    session: &InteractionSession,
    target: Target<'_>,
    value: &str,
    index: usize,
) -> Result<Outcome, InteractionError> {
    let selector = session.selector_for(target)?;

    info!(
        target_name = %target,
        selector = %selector,
        index,
        value_length = value.len(),
        "Executing drag_and_drop_text primitive"
    );

    let Some(element) = session.element_at(&selector, index).await else {
        return Ok(Outcome::not_found());
    };

    try_port!(session.port().drop_text(&element, value).await);
    session.settle().await;

    Ok(Outcome::Performed)
}
