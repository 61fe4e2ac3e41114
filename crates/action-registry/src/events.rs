//! Invocation lifecycle events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `PENDING -> RUNNING -> DONE | FAILED`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvocationStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl InvocationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvocationStatus::Done | InvocationStatus::Failed)
    }
}

/// One state transition of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationEvent {
    pub invocation_id: Uuid,
    pub app: String,
    pub action: String,
    pub status: InvocationStatus,

    /// `label_running` while running, `label_done` once done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub at: DateTime<Utc>,
}
