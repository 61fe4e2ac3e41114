use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DomQueryError;
use crate::types::QuerySelector;

/// Logical element names of one application mapped to their selectors.
///
/// When the third-party markup changes only this map changes; controllers
/// refer to elements by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySelectorMap {
    entries: BTreeMap<String, QuerySelector>,
}

impl QuerySelectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML mapping of `name: { type, selector }` entries.
    pub fn from_yaml(source: &str) -> Result<Self, DomQueryError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DomQueryError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let map = Self::from_yaml(&contents)?;
        debug!(
            path = %path.as_ref().display(),
            entries = map.len(),
            "loaded selector map"
        );
        Ok(map)
    }

    pub fn with(mut self, name: impl Into<String>, selector: QuerySelector) -> Self {
        self.entries.insert(name.into(), selector);
        self
    }

    /// Overlay `overrides` on top of this map; overriding entries win.
    pub fn merged(mut self, overrides: QuerySelectorMap) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    pub fn get(&self, name: &str) -> Option<&QuerySelector> {
        self.entries.get(name)
    }

    /// Look up a logical name; a missing name is configuration drift.
    pub fn require(&self, name: &str) -> Result<&QuerySelector, DomQueryError> {
        self.entries
            .get(name)
            .ok_or_else(|| DomQueryError::UnknownSelector {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuerySelector)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectorKind;

    const SAMPLE: &str = r#"
run_button:
  type: XPATH
  selector: "//button[@aria-label='Run query']"
sql_editor:
  type: CSS
  selector: ".ace_text-input"
"#;

    #[test]
    fn parses_yaml_entries() {
        let map = QuerySelectorMap::from_yaml(SAMPLE).unwrap();
        assert_eq!(map.len(), 2);
        let run = map.require("run_button").unwrap();
        assert_eq!(run.kind, SelectorKind::Xpath);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["run_button", "sql_editor"]);
    }

    #[test]
    fn unknown_names_are_configuration_errors() {
        let map = QuerySelectorMap::from_yaml(SAMPLE).unwrap();
        let err = map.require("cancel_button").unwrap_err();
        assert!(matches!(err, DomQueryError::UnknownSelector { ref name } if name == "cancel_button"));
    }

    #[test]
    fn overrides_replace_matching_keys_only() {
        let base = QuerySelectorMap::from_yaml(SAMPLE).unwrap();
        let overrides = QuerySelectorMap::new()
            .with("run_button", QuerySelector::css("button.run"))
            .with("error_message", QuerySelector::css(".error"));
        let merged = base.merged(overrides);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("run_button"), Some(&QuerySelector::css("button.run")));
        assert_eq!(merged.get("sql_editor").unwrap().kind, SelectorKind::Css);
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = QuerySelectorMap::from_yaml("run_button: [1, 2]").unwrap_err();
        assert!(matches!(err, DomQueryError::InvalidMap(_)));
    }
}
