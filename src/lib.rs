//! overlay-pilot library
//!
//! Configuration and session wiring shared by the binary and its tests.

pub mod config;
pub mod session;

pub use config::{CollaboratorConfig, Config, ConfigError, DispatcherConfig, LoadedConfig};
pub use session::AppSession;
