use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::content::ActionContent;
use crate::dispatcher::{ActionRecord, ActionRequest, Dispatcher};
use crate::errors::DispatchError;

/// Runs one invocation at a time, keeping only the latest waiting request.
///
/// A request that is still waiting when a newer one arrives fails with
/// [`DispatchError::Superseded`]; the running invocation is never
/// interrupted.
pub struct SerialDispatcher {
    inner: Arc<Dispatcher>,
    gate: Mutex<()>,
    latest: AtomicU64,
}

impl SerialDispatcher {
    pub fn new(inner: Arc<Dispatcher>) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
            latest: AtomicU64::new(0),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.inner
    }

    pub async fn execute(&self, request: ActionRequest) -> Result<ActionRecord, DispatchError> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let _turn = self.gate.lock().await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(action = %request.action, ticket, "request superseded while waiting");
            return Err(DispatchError::Superseded);
        }
        self.inner.execute(request).await
    }

    pub async fn run_action(&self, name: &str, args: Value) -> Result<ActionContent, DispatchError> {
        self.execute(ActionRequest::new(name, args))
            .await
            .map(|record| record.content)
    }
}
