use anyhow::{Context, Result};
use app_controllers::AppProfile;
use clap::Args;
use overlay_pilot::Config;

use crate::cli::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct SelectorsArgs {
    /// App whose selector map to print
    #[arg(long)]
    pub app: String,
}

/// Print the app profile after overrides from `controllers.selectors_dir`.
pub async fn cmd_selectors(args: SelectorsArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let profile = AppProfile::load(&args.app, config.controllers.selectors_dir.as_deref())
        .with_context(|| format!("loading the '{}' profile", args.app))?;
    let human = || {
        let width = profile
            .selectors
            .names()
            .map(str::len)
            .max()
            .unwrap_or_default();
        let mut lines: Vec<String> = profile
            .selectors
            .iter()
            .map(|(name, selector)| format!("{:width$}  {}", name, selector, width = width))
            .collect();
        for name in profile.queries.keys() {
            lines.push(format!("query: {}", name));
        }
        for name in profile.state.keys() {
            lines.push(format!("state: {}", name));
        }
        lines.join("\n")
    };
    emit(output, &profile, human)
}
