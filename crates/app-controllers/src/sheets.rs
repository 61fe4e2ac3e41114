//! Spreadsheet app driven through its name box

use std::sync::Arc;

use action_primitives::{InteractionPrimitives, Target};
use action_registry::{ActionContent, ActionMetadata, ActionTable, RenderedBody};
use anyhow::{bail, ensure};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::context::ControllerContext;
use crate::controller::{require, Controller};
use crate::ports::CodeSandbox;

const NAME_BOX: &str = "name_box";
const CELL_EDITOR: &str = "cell_editor";
const ACTIVE_CELL: &str = "active_cell";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunCodeArgs {
    /// Script to execute in the sandbox
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetCellValueArgs {
    /// Cell in A1 notation
    pub cell: String,

    /// Value or formula to enter
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HighlightCellArgs {
    /// Cell or range in A1 notation
    pub cell: String,
}

fn render_code(args: &Value) -> RenderedBody {
    RenderedBody {
        text: None,
        code: args.get("code").and_then(Value::as_str).map(str::to_string),
    }
}

fn render_assignment(args: &Value) -> RenderedBody {
    let field = |name: &str| args.get(name).and_then(Value::as_str).unwrap_or_default();
    RenderedBody {
        text: Some(format!("{} = {}", field("cell"), field("value"))),
        code: None,
    }
}

/// `A1` or `A1:C3`.
pub fn is_cell_reference(reference: &str) -> bool {
    fn single(cell: &str) -> bool {
        let letters = cell.chars().take_while(char::is_ascii_alphabetic).count();
        let digits = &cell[letters..];
        letters > 0
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
            && !digits.starts_with('0')
    }

    let mut parts = reference.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cell), None, None) => single(cell),
        (Some(start), Some(end), None) => single(start) && single(end),
        _ => false,
    }
}

/// Text typed literally by the key layer.
fn literal_keys(text: &str) -> String {
    text.replace('{', "{{")
}

pub struct SheetsController {
    ctx: ControllerContext,
    sandbox: Arc<dyn CodeSandbox>,
}

impl SheetsController {
    pub fn new(ctx: ControllerContext, sandbox: Arc<dyn CodeSandbox>) -> Self {
        Self { ctx, sandbox }
    }

    async fn run_code(&self, args: RunCodeArgs) -> anyhow::Result<ActionContent> {
        let output = self.sandbox.run(&args.code).await?;
        if let Some(error) = output.error {
            bail!("{}", error);
        }
        if output.stdout.trim().is_empty() {
            return Ok(ActionContent::text("The code ran without output."));
        }
        Ok(ActionContent::text(output.stdout))
    }

    /// Jump to `cell` by typing it into the name box.
    async fn go_to(&self, cell: &str) -> anyhow::Result<String> {
        let cell = cell.trim().to_ascii_uppercase();
        ensure!(is_cell_reference(&cell), "'{}' is not an A1 cell reference", cell);

        let session = self.ctx.session();
        require(
            session.click(Target::Named(NAME_BOX), 0).await?,
            "focus the name box",
        )?;
        session.select_all_text(true).await?;
        require(
            session
                .type_text(Target::Named(NAME_BOX), &format!("{}{{Enter}}", cell), 0)
                .await?,
            "navigate to the cell",
        )?;
        info!(cell = %cell, "navigated to cell");
        Ok(cell)
    }

    async fn set_cell_value(&self, args: SetCellValueArgs) -> anyhow::Result<ActionContent> {
        let cell = self.go_to(&args.cell).await?;
        let keys = format!("{}{{Enter}}", literal_keys(&args.value));
        require(
            self.ctx
                .session()
                .type_text(Target::Named(CELL_EDITOR), &keys, 0)
                .await?,
            "enter the value",
        )?;
        Ok(ActionContent::text(format!("Set {} to {}", cell, args.value)))
    }

    async fn highlight_cell(&self, args: HighlightCellArgs) -> anyhow::Result<ActionContent> {
        let cell = self.go_to(&args.cell).await?;
        let session = self.ctx.session();
        session.clear_highlight().await?;
        require(
            session.highlight(Target::Named(ACTIVE_CELL), 0, None).await?,
            "highlight the cell",
        )?;
        Ok(ActionContent::text(format!("Highlighted {}", cell)))
    }
}

impl Controller for SheetsController {
    const APP_ID: &'static str = "sheets";

    fn build_actions() -> ActionTable<Self> {
        let mut table = ActionTable::with_base_actions();
        table
            .register(
                ActionMetadata::new(
                    "runCode",
                    "Run a script against the open spreadsheet and return what it printed.",
                )
                .labels("Running code", "Ran code")
                .render_with(render_code),
                |sheets: Arc<Self>, args: RunCodeArgs| async move { sheets.run_code(args).await },
            )
            .register(
                ActionMetadata::new("setCellValue", "Enter a value or formula into one cell.")
                    .labels("Setting cell value", "Set cell value")
                    .render_with(render_assignment),
                |sheets: Arc<Self>, args: SetCellValueArgs| async move {
                    sheets.set_cell_value(args).await
                },
            )
            .register(
                ActionMetadata::new("highlightCell", "Select a cell and outline it for the user.")
                    .labels("Highlighting cell", "Highlighted cell"),
                |sheets: Arc<Self>, args: HighlightCellArgs| async move {
                    sheets.highlight_cell(args).await
                },
            );
        table
    }

    fn context(&self) -> &ControllerContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_a1_references() {
        for valid in ["A1", "AB12", "A1:C3"] {
            assert!(is_cell_reference(valid), "{valid}");
        }
        for invalid in ["", "1A", "A", "A0", "A1:", "A1:B2:C3", "A-1"] {
            assert!(!is_cell_reference(invalid), "{invalid}");
        }
    }

    #[test]
    fn braces_are_escaped_for_the_key_layer() {
        assert_eq!(literal_keys("={A1}"), "={{A1}");
        assert_eq!(
            dom_query::parse_key_sequence(&literal_keys("={A1}")),
            vec![dom_query::KeyInput::Text("={A1}".into())]
        );
    }
}
