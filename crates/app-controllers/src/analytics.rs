//! Product analytics tool with a query console

use std::sync::Arc;

use action_registry::{ActionMetadata, ActionTable, RenderedBody};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::bi::{render_tables, TableNamesArgs};
use crate::context::ControllerContext;
use crate::controller::{describe_tables, Controller, QueryConsole};
use crate::ports::SchemaSource;

const CONSOLE: QueryConsole = QueryConsole::standard("query_editor");

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateQueryArgs {
    /// Query text that replaces the console content
    pub query: String,

    /// Run the query after updating it
    #[serde(default)]
    pub execute: bool,
}

fn render_query(args: &Value) -> RenderedBody {
    RenderedBody {
        text: None,
        code: args.get("query").and_then(Value::as_str).map(str::to_string),
    }
}

pub struct AnalyticsController {
    ctx: ControllerContext,
    schemas: Arc<dyn SchemaSource>,
}

impl AnalyticsController {
    pub fn new(ctx: ControllerContext, schemas: Arc<dyn SchemaSource>) -> Self {
        Self { ctx, schemas }
    }
}

impl Controller for AnalyticsController {
    const APP_ID: &'static str = "analytics";

    fn build_actions() -> ActionTable<Self> {
        let mut table = ActionTable::with_base_actions();
        table
            .register(
                ActionMetadata::new(
                    "updateQuery",
                    "Replace the query in the console; set execute to run it and read back the results.",
                )
                .labels("Updating query", "Updated query")
                .render_with(render_query),
                |analytics: Arc<Self>, args: UpdateQueryArgs| async move {
                    CONSOLE
                        .update_and_run(&analytics.ctx, &args.query, args.execute)
                        .await
                },
            )
            .register(
                ActionMetadata::new(
                    "getEventSchema",
                    "Fetch the properties of the given event tables.",
                )
                .labels("Reading event schema", "Read event schema")
                .render_with(render_tables),
                |analytics: Arc<Self>, args: TableNamesArgs| async move {
                    describe_tables(analytics.schemas.as_ref(), &args.tables).await
                },
            );
        table
    }

    fn context(&self) -> &ControllerContext {
        &self.ctx
    }
}
