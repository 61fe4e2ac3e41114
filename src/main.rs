//! overlay-pilot command line
//!
//! Lists and runs the actions each supported web app exposes.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::cli::output::OutputFormat;
use crate::cli::runtime::{init_logging, load_config};
use crate::cli::{
    cmd_actions, cmd_config, cmd_run, cmd_selectors, ActionsArgs, ConfigArgs, RunArgs,
    SelectorsArgs,
};

#[derive(Parser)]
#[command(name = "overlay-pilot")]
#[command(version, about = "Drive web apps through named actions")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the actions an app exposes
    Actions(ActionsArgs),

    /// Run one action against the app open in the browser
    Run(RunArgs),

    /// Show an app's effective selector map
    Selectors(SelectorsArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.debug)?;
    info!("Starting overlay-pilot v{}", env!("CARGO_PKG_VERSION"));

    let loaded = load_config(cli.config.as_ref()).await?;

    let result = match cli.command {
        Commands::Actions(args) => cmd_actions(args, &loaded.config, cli.output).await,
        Commands::Run(args) => cmd_run(args, &loaded.config, cli.output).await,
        Commands::Selectors(args) => cmd_selectors(args, &loaded.config, cli.output).await,
        Commands::Config(args) => cmd_config(args, &loaded, cli.output).await,
    };

    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_takes_app_action_and_args() {
        let cli = Cli::try_parse_from([
            "overlay-pilot",
            "--output",
            "yaml",
            "run",
            "--app",
            "bi",
            "--action",
            "updateSqlQuery",
            "--args",
            r#"{"sql":"SELECT 1"}"#,
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Yaml);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.app, "bi");
                assert_eq!(args.action, "updateSqlQuery");
                assert!(!args.events);
            }
            _ => panic!("expected run"),
        }
    }
}
