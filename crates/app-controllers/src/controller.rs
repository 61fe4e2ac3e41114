use std::sync::Arc;

use action_primitives::{InteractionPrimitives, Outcome, Target};
use action_registry::{ActionContent, ActionTable, BoundController};
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::context::ControllerContext;
use crate::ports::SchemaSource;
use crate::render::{schemas_to_markdown, ResultTable};

/// One supported host application.
///
/// Implementors declare their actions in [`Controller::build_actions`]; the
/// table is built once when the controller is bound.
#[async_trait]
pub trait Controller: Send + Sync + Sized + 'static {
    const APP_ID: &'static str;

    fn app_id(&self) -> &'static str {
        Self::APP_ID
    }

    fn build_actions() -> ActionTable<Self>;

    fn context(&self) -> &ControllerContext;

    /// Snapshot of what the app currently shows.
    async fn app_state(&self) -> Value {
        self.context().snapshot().await
    }

    fn bind(self) -> BoundController<Self> {
        BoundController::new(Self::APP_ID, Arc::new(self), Self::build_actions())
    }
}

/// Fail the action when a required step was skipped.
pub(crate) fn require(outcome: Outcome, step: &str) -> anyhow::Result<()> {
    match outcome {
        Outcome::Performed => Ok(()),
        Outcome::Skipped(reason) => bail!("could not {}: {}", step, reason),
    }
}

/// Logical element names of a query console.
pub(crate) struct QueryConsole {
    pub editor: &'static str,
    pub run_button: &'static str,
    pub running_indicator: &'static str,
    pub error_message: &'static str,
    pub results: &'static str,
}

impl QueryConsole {
    pub(crate) const fn standard(editor: &'static str) -> Self {
        Self {
            editor,
            run_button: "run_button",
            running_indicator: "running_indicator",
            error_message: "error_message",
            results: "results",
        }
    }

    /// Replace the editor content and, when asked, run it and report back
    /// either the error shown by the app or the result table.
    pub(crate) async fn update_and_run(
        &self,
        ctx: &ControllerContext,
        text: &str,
        execute: bool,
    ) -> anyhow::Result<ActionContent> {
        let session = ctx.session();

        let outcome = session.set_value(Target::Named(self.editor), text, 0).await?;
        require(outcome, "update the query editor")?;
        if !execute {
            return Ok(ActionContent::text("Updated the query without running it."));
        }

        let outcome = session.click(Target::Named(self.run_button), 0).await?;
        require(outcome, "start the query")?;
        let polls = ctx
            .wait_until_idle(self.running_indicator)
            .await
            .context("query did not finish")?;
        info!(app = %ctx.app(), polls, "query finished");

        if let Some(error) = ctx.read_text(self.error_message).await? {
            debug!(app = %ctx.app(), error = %error, "query reported an error");
            return Ok(ActionContent::text(format!(
                "The query failed with an error:\n{}",
                error
            )));
        }

        let records = session.resolver().resolve_query(ctx.query(self.results)?).await;
        let content = match ResultTable::from_records(&records) {
            Some(table) if !table.is_empty() => format!(
                "Query results:\n\n{}",
                table.to_markdown(ctx.max_result_rows())
            ),
            _ => "The query ran but returned no rows.".to_string(),
        };
        Ok(ActionContent::text(content))
    }
}

/// Look up every named table; unknown names are reported, not fatal.
pub(crate) async fn describe_tables(
    schemas: &dyn SchemaSource,
    tables: &[String],
) -> anyhow::Result<ActionContent> {
    if tables.is_empty() {
        bail!("no tables requested");
    }

    let mut found = Vec::new();
    let mut missing = Vec::new();
    for table in tables {
        match schemas
            .table_schema(table)
            .await
            .with_context(|| format!("fetching schema of '{}'", table))?
        {
            Some(schema) => found.push(schema),
            None => missing.push(table.clone()),
        }
    }
    Ok(ActionContent::text(schemas_to_markdown(&found, &missing)))
}
