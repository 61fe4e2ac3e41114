use anyhow::Result;
use clap::{Args, Subcommand};
use overlay_pilot::LoadedConfig;

use crate::cli::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
}

pub async fn cmd_config(args: ConfigArgs, loaded: &LoadedConfig, output: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let yaml = loaded.config.to_yaml()?;
            emit(output, &loaded.config, || {
                let source = if loaded.from_file {
                    loaded.path.display().to_string()
                } else {
                    format!("defaults; {} not found", loaded.path.display())
                };
                format!("Current configuration ({}):\n{}", source, yaml)
            })
        }
    }
}
