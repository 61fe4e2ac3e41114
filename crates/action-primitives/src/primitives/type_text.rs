//! Type text primitive - keyboard input into a resolved element

use dom_query::parse_key_sequence;
use tracing::info;

use crate::{
    errors::InteractionError,
    session::InteractionSession,
    types::{Outcome, Target},
};

/// Execute type_text primitive
///
/// `text` may embed special keys such as `{Enter}` or `{ArrowLeft}`; the
/// element is focused before the first key.
pub(crate) async fn execute_type_text(
    session: &InteractionSession,
    target: Target<'_>,
    text: &str,
    index: usize,
) -> Result<Outcome, InteractionError> {
    let selector = session.selector_for(target)?;

    info!(
        target_name = %target,
        selector = %selector,
        index,
        text_length = text.len(),
        "Executing type_text primitive"
    );

    let Some(element) = session.element_at(&selector, index).await else {
        return Ok(Outcome::not_found());
    };

    let keys = parse_key_sequence(text);
    try_port!(session.port().send_keys(Some(&element), &keys).await);
    session.settle().await;

    Ok(Outcome::Performed)
}
