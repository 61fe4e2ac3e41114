pub mod actions;
pub mod config;
pub mod output;
pub mod run;
pub mod runtime;
pub mod selectors;

pub use actions::{cmd_actions, ActionsArgs};
pub use config::{cmd_config, ConfigArgs};
pub use run::{cmd_run, RunArgs};
pub use selectors::{cmd_selectors, SelectorsArgs};
