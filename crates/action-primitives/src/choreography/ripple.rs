use tracing::info;

use crate::{
    errors::InteractionError,
    session::InteractionSession,
    types::{Outcome, Target},
};

impl InteractionSession {
    /// Cosmetic click feedback at the element's center; skipped when the
    /// element or its coordinates cannot be read.
    pub async fn ripple(&self, target: Target<'_>, index: usize) -> Result<Outcome, InteractionError> {
        let selector = self.selector_for(target)?;
        info!(target_name = %target, selector = %selector, index, "Showing ripple");

        let Some(element) = self.element_at(&selector, index).await else {
            return Ok(Outcome::not_found());
        };

        let port = self.port();
        let (x, y) = try_port!(port.bounding_rect(&element).await).center();
        try_port!(port.show_ripple(x, y, self.timings().ripple_duration_ms).await);

        Ok(Outcome::Performed)
    }
}
