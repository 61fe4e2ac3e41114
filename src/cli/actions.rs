use std::sync::Arc;

use anyhow::Result;
use cdp_adapter::NoopRuntime;
use clap::Args;
use dom_query::ScriptDomPort;
use overlay_pilot::{session, AppSession, Config};

use crate::cli::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ActionsArgs {
    /// App whose actions to list (bi, analytics, sheets)
    #[arg(long)]
    pub app: String,
}

/// Print the action catalogue. No browser is needed to describe actions.
pub async fn cmd_actions(args: ActionsArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let port = Arc::new(ScriptDomPort::new(Arc::new(NoopRuntime)));
    let collaborators = session::collaborators(config).await?;
    let session = AppSession::open(&args.app, port, config, &collaborators)?;
    emit(output, &session.catalogue(), || session.prompt_block())
}
