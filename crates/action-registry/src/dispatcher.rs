use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::content::ActionContent;
use crate::errors::DispatchError;
use crate::events::{InvocationEvent, InvocationStatus};
use crate::metadata::{ActionDescriptor, RenderedBody};
use crate::table::ActionTarget;

const EVENT_CAPACITY: usize = 64;

/// `{ action, args }` as sent by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,

    #[serde(default)]
    pub args: Value,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, args: Value) -> Self {
        Self {
            action: action.into(),
            args,
        }
    }
}

/// Outcome of one invocation that reached the action body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub invocation_id: Uuid,
    pub app: String,
    pub action: String,
    pub status: InvocationStatus,

    /// Label matching the terminal status
    pub label: Option<String>,

    pub content: ActionContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub latency_ms: u64,
    pub started_at: DateTime<Utc>,

    #[serde(default)]
    pub rendered: RenderedBody,
}

impl ActionRecord {
    pub fn is_done(&self) -> bool {
        self.status == InvocationStatus::Done
    }
}

/// Routes action requests to the active controller.
///
/// The dispatcher itself does not serialize overlapping calls; wrap it in
/// [`crate::SerialDispatcher`] when requests may overlap.
pub struct Dispatcher {
    active: RwLock<Option<Arc<dyn ActionTarget>>>,
    events: broadcast::Sender<InvocationEvent>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            active: RwLock::new(None),
            events,
        }
    }

    pub fn with_target(target: Arc<dyn ActionTarget>) -> Self {
        let dispatcher = Self::new();
        dispatcher.set_active(target);
        dispatcher
    }

    /// Swap the active controller; returns the previous one.
    pub fn set_active(&self, target: Arc<dyn ActionTarget>) -> Option<Arc<dyn ActionTarget>> {
        info!(app = %target.app_id(), "activating controller");
        self.active.write().replace(target)
    }

    pub fn clear_active(&self) -> Option<Arc<dyn ActionTarget>> {
        self.active.write().take()
    }

    pub fn active_app(&self) -> Option<String> {
        self.active
            .read()
            .as_ref()
            .map(|target| target.app_id().to_string())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InvocationEvent> {
        self.events.subscribe()
    }

    /// Actions of the active controller, in registration order.
    pub fn catalogue(&self) -> Vec<ActionDescriptor> {
        self.active
            .read()
            .as_ref()
            .map(|target| target.catalogue())
            .unwrap_or_default()
    }

    pub fn prompt_block(&self) -> String {
        self.catalogue()
            .iter()
            .map(ActionDescriptor::prompt_block)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Run `name` and return its content; failures of the body come back as
    /// error content, never as `Err`.
    pub async fn run_action(&self, name: &str, args: Value) -> Result<ActionContent, DispatchError> {
        self.execute(ActionRequest::new(name, args))
            .await
            .map(|record| record.content)
    }

    pub async fn execute(&self, request: ActionRequest) -> Result<ActionRecord, DispatchError> {
        let target = self
            .active
            .read()
            .clone()
            .ok_or(DispatchError::NoActiveController)?;
        let app = target.app_id().to_string();

        let Some(metadata) = target.metadata(&request.action) else {
            warn!(app = %app, action = %request.action, "unknown action requested");
            return Err(DispatchError::UnknownAction {
                action: request.action,
                app,
            });
        };

        let invocation_id = Uuid::new_v4();
        let started_at = Utc::now();
        let rendered = metadata.render_body(&request.args);
        let publish = |status: InvocationStatus, label: Option<&str>| {
            let _ = self.events.send(InvocationEvent {
                invocation_id,
                app: app.clone(),
                action: request.action.clone(),
                status,
                label: label.map(str::to_string),
                at: Utc::now(),
            });
        };

        publish(InvocationStatus::Pending, None);
        let Some(future) = target.invoke(&request.action, request.args.clone()) else {
            // Table changed between lookup and invoke.
            return Err(DispatchError::UnknownAction {
                action: request.action.clone(),
                app: app.clone(),
            });
        };

        let span = info_span!(
            "action",
            app = %app,
            action = %request.action,
            invocation = %invocation_id
        );
        let clock = Instant::now();
        publish(InvocationStatus::Running, Some(&metadata.label_running));
        let result = AssertUnwindSafe(future)
            .catch_unwind()
            .instrument(span.clone())
            .await;
        let latency_ms = clock.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(err)) => Err(format!("{:#}", err)),
            Err(panic) => Err(panic_message(panic)),
        };

        let record = match outcome {
            Ok(content) => {
                span.in_scope(|| info!(latency_ms, "action finished"));
                publish(InvocationStatus::Done, Some(&metadata.label_done));
                ActionRecord {
                    invocation_id,
                    app: app.clone(),
                    action: request.action.clone(),
                    status: InvocationStatus::Done,
                    label: Some(metadata.label_done.clone()),
                    content,
                    error: None,
                    latency_ms,
                    started_at,
                    rendered,
                }
            }
            Err(message) => {
                span.in_scope(|| warn!(latency_ms, error = %message, "action failed"));
                publish(InvocationStatus::Failed, None);
                ActionRecord {
                    invocation_id,
                    app: app.clone(),
                    action: request.action.clone(),
                    status: InvocationStatus::Failed,
                    label: None,
                    content: ActionContent::error(&message),
                    error: Some(message),
                    latency_ms,
                    started_at,
                    rendered,
                }
            }
        };
        Ok(record)
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("action panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("action panicked: {}", message)
    } else {
        "action panicked".to_string()
    }
}
