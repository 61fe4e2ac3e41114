use std::sync::Arc;

use action_registry::ActionRequest;
use anyhow::{bail, Context, Result};
use cdp_adapter::ChromiumRuntime;
use clap::Args;
use dom_query::ScriptDomPort;
use overlay_pilot::{session, AppSession, Config};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::cli::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// App the browser tab is showing (bi, analytics, sheets)
    #[arg(long)]
    pub app: String,

    /// Action name as listed by `actions`
    #[arg(long)]
    pub action: String,

    /// Arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,

    /// Log lifecycle events while the action runs
    #[arg(long)]
    pub events: bool,
}

pub fn parse_args(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).context("--args is not valid JSON")?;
    if !(value.is_object() || value.is_null()) {
        bail!("--args must be a JSON object");
    }
    Ok(value)
}

pub async fn cmd_run(args: RunArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let action_args = parse_args(&args.args)?;
    let collaborators = session::collaborators(config).await?;

    let runtime = Arc::new(
        ChromiumRuntime::start(config.cdp.clone())
            .await
            .context("Failed to attach to the browser")?,
    );
    let port = Arc::new(ScriptDomPort::new(runtime.clone()));
    let session = AppSession::open(&args.app, port, config, &collaborators)?;
    info!(
        app = %session.app(),
        serial = session.is_serial(),
        "controller attached"
    );

    let watcher = args.events.then(|| {
        let mut events = session.dispatcher().subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => info!(
                        action = %event.action,
                        status = ?event.status,
                        label = event.label.as_deref().unwrap_or(""),
                        "invocation event"
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "event watcher lagged")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    });

    let result = session
        .execute(ActionRequest::new(args.action.clone(), action_args))
        .await;

    drop(session);
    if let Some(watcher) = watcher {
        let _ = watcher.await;
    }
    match Arc::try_unwrap(runtime) {
        Ok(runtime) => {
            if let Err(err) = runtime.shutdown().await {
                warn!(%err, "browser shutdown failed");
            }
        }
        Err(_) => warn!("browser runtime still in use; skipping shutdown"),
    }

    let record = result?;
    let format = match output {
        OutputFormat::Human => OutputFormat::Json,
        other => other,
    };
    emit(format, &record, String::new)?;
    if !record.is_done() {
        bail!("action '{}' failed", args.action);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_must_be_an_object() {
        assert!(parse_args(r#"{"sql": "SELECT 1"}"#).unwrap().is_object());
        assert!(parse_args("null").unwrap().is_null());
        assert!(parse_args("[1]").is_err());
        assert!(parse_args("{").is_err());
    }
}
