//! Configuration file model
//!
//! One YAML document with a section per layer. Every section falls back to
//! its defaults, so a file only needs the keys it changes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use action_primitives::InteractionTimings;
use app_controllers::ports::TableSchema;
use app_controllers::ControllerSettings;
use cdp_adapter::CdpConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under the platform config dir that holds `config.yaml`.
pub const CONFIG_DIR_NAME: &str = "overlay-pilot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cdp: CdpConfig,
    pub interaction: InteractionTimings,
    pub dispatcher: DispatcherConfig,
    pub controllers: ControllerSettings,
    pub collaborators: CollaboratorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Run one invocation at a time, dropping superseded waiters
    pub serialize: bool,

    /// Give up on a running query after this long
    pub query_deadline_ms: Option<u64>,
}

impl DispatcherConfig {
    pub fn query_deadline(&self) -> Option<Duration> {
        self.query_deadline_ms.map(Duration::from_millis)
    }
}

/// Where the external collaborators of the controllers come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    /// YAML list of table schemas served to `getTableSchemas`/`getEventSchema`
    pub schema_file: Option<PathBuf>,
}

/// Configuration together with the file it was (or would have been) read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub from_file: bool,
}

impl Config {
    pub fn from_yaml(path: &Path, source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// `explicit` if given, else `config/config.yaml` when it exists, else the
/// file under the platform config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("config/config.yaml");
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.yaml"))
}

/// Read the configuration; a missing file yields the defaults.
pub async fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = resolve_config_path(explicit).unwrap_or_else(|| PathBuf::from("config/config.yaml"));
    if !path.exists() {
        return Ok(LoadedConfig {
            config: Config::default(),
            path,
            from_file: false,
        });
    }

    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
    let config = Config::from_yaml(&path, &content)?;
    Ok(LoadedConfig {
        config,
        path,
        from_file: true,
    })
}

/// Parse a schema file: a YAML list of tables with their columns.
pub async fn load_schema_file(path: &Path) -> Result<Vec<TableSchema>, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = Config::from_yaml(
            Path::new("inline.yaml"),
            "dispatcher:\n  serialize: true\ncontrollers:\n  max_result_rows: 5\n",
        )
        .unwrap();
        assert!(config.dispatcher.serialize);
        assert_eq!(config.dispatcher.query_deadline(), None);
        assert_eq!(config.controllers.max_result_rows, 5);
        assert_eq!(config.interaction, InteractionTimings::default());
        assert_eq!(config.cdp.default_deadline_ms, 30_000);
    }

    #[test]
    fn query_deadline_is_read_in_milliseconds() {
        let config = Config::from_yaml(
            Path::new("inline.yaml"),
            "dispatcher:\n  query_deadline_ms: 1500\n",
        )
        .unwrap();
        assert_eq!(
            config.dispatcher.query_deadline(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn parse_errors_name_the_file() {
        let err = Config::from_yaml(Path::new("broken.yaml"), "dispatcher: [").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse broken.yaml"));
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/custom.yaml")));
        assert_eq!(path, Some(PathBuf::from("/tmp/custom.yaml")));
    }
}
