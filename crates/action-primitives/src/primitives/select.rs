//! Select-all primitive - edit commands on the focused surface

use dom_query::EditCommand;
use tracing::info;

use crate::{errors::InteractionError, session::InteractionSession, types::Outcome};

/// Execute select_all_text primitive
///
/// Not element-scoped: acts on whatever currently holds focus, so callers
/// establish focus first (usually with a click).
pub(crate) async fn execute_select_all_text(
    session: &InteractionSession,
    should_delete: bool,
) -> Result<Outcome, InteractionError> {
    info!(should_delete, "Executing select_all_text primitive");

    let port = session.port();
    try_port!(port.exec_edit_command(EditCommand::SelectAll).await);
    if should_delete {
        try_port!(port.exec_edit_command(EditCommand::Delete).await);
    }
    session.settle().await;

    Ok(Outcome::Performed)
}
