//! BI tool with a native SQL editor

use std::sync::Arc;

use action_registry::{ActionContent, ActionMetadata, ActionTable, RenderedBody};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::context::ControllerContext;
use crate::controller::{describe_tables, Controller, QueryConsole};
use crate::ports::SchemaSource;

const CONSOLE: QueryConsole = QueryConsole::standard("sql_editor");

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateSqlQueryArgs {
    /// Complete SQL text that replaces the editor content
    pub sql: String,

    /// Run the query after updating it
    #[serde(default)]
    pub execute: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TableNamesArgs {
    /// Tables to describe
    pub tables: Vec<String>,
}

fn render_sql(args: &Value) -> RenderedBody {
    RenderedBody {
        text: None,
        code: args.get("sql").and_then(Value::as_str).map(str::to_string),
    }
}

pub(crate) fn render_tables(args: &Value) -> RenderedBody {
    let tables = args
        .get("tables")
        .and_then(Value::as_array)
        .map(|tables| {
            tables
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    RenderedBody {
        text: Some(tables),
        code: None,
    }
}

pub struct BiController {
    ctx: ControllerContext,
    schemas: Arc<dyn SchemaSource>,
}

impl BiController {
    pub fn new(ctx: ControllerContext, schemas: Arc<dyn SchemaSource>) -> Self {
        Self { ctx, schemas }
    }

    async fn update_sql_query(&self, args: UpdateSqlQueryArgs) -> anyhow::Result<ActionContent> {
        CONSOLE.update_and_run(&self.ctx, &args.sql, args.execute).await
    }

    async fn get_table_schemas(&self, args: TableNamesArgs) -> anyhow::Result<ActionContent> {
        describe_tables(self.schemas.as_ref(), &args.tables).await
    }
}

impl Controller for BiController {
    const APP_ID: &'static str = "bi";

    fn build_actions() -> ActionTable<Self> {
        let mut table = ActionTable::with_base_actions();
        table
            .register(
                ActionMetadata::new(
                    "updateSqlQuery",
                    "Replace the SQL in the native query editor; set execute to run it and read back the results.",
                )
                .labels("Updating SQL query", "Updated SQL query")
                .render_with(render_sql),
                |bi: Arc<Self>, args: UpdateSqlQueryArgs| async move {
                    bi.update_sql_query(args).await
                },
            )
            .register(
                ActionMetadata::new(
                    "getTableSchemas",
                    "Fetch column names and types of the given tables.",
                )
                .labels("Reading table schemas", "Read table schemas")
                .render_with(render_tables),
                |bi: Arc<Self>, args: TableNamesArgs| async move {
                    bi.get_table_schemas(args).await
                },
            );
        table
    }

    fn context(&self) -> &ControllerContext {
        &self.ctx
    }
}
