//! Planner-visible results of running an action

use serde::{Deserialize, Serialize};

/// Outcome of one action, as delivered to the planner and the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ActionContent {
    Default {
        text: String,
        #[serde(default)]
        images: Vec<String>,
    },
    Blank {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

impl ActionContent {
    pub fn text(text: impl Into<String>) -> Self {
        ActionContent::Default {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn blank() -> Self {
        ActionContent::Blank { content: None }
    }

    /// Content reporting a failed action body.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::text(format!("Error: {}", message))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ActionContent::Default { text, .. } => Some(text),
            ActionContent::Blank { content } => content.as_deref(),
        }
    }
}
