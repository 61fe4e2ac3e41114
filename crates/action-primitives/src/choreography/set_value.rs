use tracing::{debug, info};

use crate::{
    errors::InteractionError,
    primitives::InteractionPrimitives,
    session::InteractionSession,
    types::{Outcome, Target},
};

/// Run one step; a skipped step ends the choreography with its outcome.
macro_rules! step {
    ($expr:expr) => {
        match $expr? {
            Outcome::Performed => {}
            skipped => {
                debug!(outcome = ?skipped, "set_value step skipped; stopping");
                return Ok(skipped);
            }
        }
    };
}

impl InteractionSession {
    /// Replace the content of an editable widget that ignores programmatic
    /// value changes.
    ///
    /// Sequence: ripple, double-click, `{ArrowLeft}`, select-all, drop the
    /// new value as plain text, trailing `{ArrowLeft}`. The drop stands in
    /// for a paste; rich editors honour it where they drop synthetic key
    /// events.
    pub async fn set_value(
        &self,
        target: Target<'_>,
        value: &str,
        index: usize,
    ) -> Result<Outcome, InteractionError> {
        let selector = self.selector_for(target)?;

        info!(
            target_name = %target,
            selector = %selector,
            index,
            value_length = value.len(),
            "Executing set_value choreography"
        );

        if self.element_at(&selector, index).await.is_none() {
            return Ok(Outcome::not_found());
        }
        let target = Target::Selector(&selector);

        // 1. Feedback only; its outcome does not matter
        let ripple = self.ripple(target, index).await?;
        if !ripple.is_performed() {
            debug!(outcome = ?ripple, "ripple skipped");
        }

        // 2. Focus and select the existing content
        step!(self.double_click(target, index).await);

        // 3. Collapse the word selection
        step!(self.type_text(target, "{ArrowLeft}", index).await);

        // 4. Select everything
        step!(self.select_all_text(false).await);

        // 5. Replace the selection
        step!(self.drag_and_drop_text(target, value, index).await);

        // 6. Collapse the cursor
        step!(self.type_text(target, "{ArrowLeft}", index).await);

        Ok(Outcome::Performed)
    }
}
