use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Presentation of an invocation's arguments, e.g. the SQL being run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

pub type RenderFn = fn(&Value) -> RenderedBody;

fn render_nothing(_args: &Value) -> RenderedBody {
    RenderedBody::default()
}

/// Immutable description of one action, attached at registration.
#[derive(Clone)]
pub struct ActionMetadata {
    pub name: String,
    pub label_running: String,
    pub label_done: String,
    pub description: String,

    /// JSON schema of the typed argument struct
    pub args_schema: Value,

    pub render: RenderFn,
}

impl fmt::Debug for ActionMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionMetadata")
            .field("name", &self.name)
            .field("label_running", &self.label_running)
            .field("label_done", &self.label_done)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ActionMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label_running: format!("Running {}", name),
            label_done: format!("Finished {}", name),
            name,
            description: description.into(),
            args_schema: Value::Null,
            render: render_nothing,
        }
    }

    pub fn labels(mut self, running: impl Into<String>, done: impl Into<String>) -> Self {
        self.label_running = running.into();
        self.label_done = done.into();
        self
    }

    pub fn render_with(mut self, render: RenderFn) -> Self {
        self.render = render;
        self
    }

    pub(crate) fn with_schema<A: JsonSchema>(mut self) -> Self {
        self.args_schema = serde_json::to_value(schemars::schema_for!(A)).unwrap_or_default();
        self
    }

    pub fn render_body(&self, args: &Value) -> RenderedBody {
        (self.render)(args)
    }

    pub fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            label_running: self.label_running.clone(),
            label_done: self.label_done.clone(),
            args_schema: self.args_schema.clone(),
        }
    }
}

/// Planner-facing view of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    pub label_running: String,
    pub label_done: String,
    pub args_schema: Value,
}

impl ActionDescriptor {
    pub fn required_fields(&self) -> Vec<String> {
        self.args_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn optional_fields(&self) -> Vec<String> {
        let required = self.required_fields();
        self.args_schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .keys()
                    .filter(|key| !required.contains(key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn prompt_block(&self) -> String {
        let mut lines = vec![format!("• {}: {}", self.name, self.description)];
        let required = self.required_fields();
        if !required.is_empty() {
            lines.push(format!("  Required fields: {}", required.join(", ")));
        }
        let optional = self.optional_fields();
        if !optional.is_empty() {
            lines.push(format!("  Optional fields: {}", optional.join(", ")));
        }
        lines.join("\n")
    }
}
