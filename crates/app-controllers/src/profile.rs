use std::collections::BTreeMap;
use std::path::Path;

use dom_query::{DomQuery, QuerySelectorMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ControllerError;

const BI_PROFILE: &str = include_str!("../selectors/bi.yaml");
const ANALYTICS_PROFILE: &str = include_str!("../selectors/analytics.yaml");
const SHEETS_PROFILE: &str = include_str!("../selectors/sheets.yaml");

/// What one host application's markup looks like.
///
/// `selectors` names single elements, `queries` extracts structured data,
/// `state` lists the queries that make up the app state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppProfile {
    #[serde(default)]
    pub selectors: QuerySelectorMap,

    #[serde(default)]
    pub queries: BTreeMap<String, DomQuery>,

    #[serde(default)]
    pub state: BTreeMap<String, DomQuery>,
}

impl AppProfile {
    pub fn from_yaml(app: &str, source: &str) -> Result<Self, ControllerError> {
        serde_yaml::from_str(source).map_err(|source| ControllerError::InvalidProfile {
            app: app.to_string(),
            source,
        })
    }

    /// The profile compiled into the binary.
    pub fn embedded(app: &str) -> Result<Self, ControllerError> {
        let source = match app {
            "bi" => BI_PROFILE,
            "analytics" => ANALYTICS_PROFILE,
            "sheets" => SHEETS_PROFILE,
            _ => {
                return Err(ControllerError::UnknownApp {
                    app: app.to_string(),
                })
            }
        };
        Self::from_yaml(app, source)
    }

    /// The embedded profile with `<dir>/<app>.yaml` laid over it, if present.
    pub fn load(app: &str, overrides_dir: Option<&Path>) -> Result<Self, ControllerError> {
        let profile = Self::embedded(app)?;
        let Some(dir) = overrides_dir else {
            return Ok(profile);
        };

        let path = dir.join(format!("{}.yaml", app));
        if !path.exists() {
            debug!(path = %path.display(), "no profile override");
            return Ok(profile);
        }
        let contents =
            std::fs::read_to_string(&path).map_err(|source| ControllerError::ProfileIo {
                path: path.display().to_string(),
                source,
            })?;
        let overrides = Self::from_yaml(app, &contents)?;
        debug!(
            path = %path.display(),
            selectors = overrides.selectors.len(),
            queries = overrides.queries.len(),
            "applying profile override"
        );
        Ok(profile.merged(overrides))
    }

    /// Overlay `overrides`; entries in `overrides` win per name.
    pub fn merged(mut self, overrides: AppProfile) -> Self {
        self.selectors = self.selectors.merged(overrides.selectors);
        self.queries.extend(overrides.queries);
        self.state.extend(overrides.state);
        self
    }

    pub fn query(&self, app: &str, name: &str) -> Result<&DomQuery, ControllerError> {
        self.queries
            .get(name)
            .ok_or_else(|| ControllerError::MissingQuery {
                app: app.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::SelectorKind;

    #[test]
    fn embedded_profiles_parse() {
        for app in ["bi", "analytics", "sheets"] {
            let profile = AppProfile::embedded(app).unwrap();
            assert!(!profile.selectors.is_empty(), "{app}");
        }
        assert!(matches!(
            AppProfile::embedded("crm"),
            Err(ControllerError::UnknownApp { .. })
        ));
    }

    #[test]
    fn overrides_win_per_name() {
        let overrides = AppProfile::from_yaml(
            "bi",
            r#"
selectors:
  run_button:
    type: CSS
    selector: "button.run"
"#,
        )
        .unwrap();
        let profile = AppProfile::embedded("bi").unwrap().merged(overrides);

        let run = profile.selectors.get("run_button").unwrap();
        assert_eq!(run.kind, SelectorKind::Css);
        assert_eq!(run.expression, "button.run");
        assert!(profile.selectors.get("sql_editor").is_some());
        assert!(profile.query("bi", "results").is_ok());
    }

    #[test]
    fn override_files_are_optional() {
        let dir = std::env::temp_dir().join("overlay-pilot-no-overrides");
        let profile = AppProfile::load("sheets", Some(&dir)).unwrap();
        assert_eq!(profile, AppProfile::embedded("sheets").unwrap());
    }
}
