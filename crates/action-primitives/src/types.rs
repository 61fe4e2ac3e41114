//! Core data types for action primitives

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use dom_query::QuerySelector;
use serde::{Deserialize, Serialize};

/// What a primitive acts on.
///
/// A logical name is looked up in the session's selector map; a raw selector
/// is used as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Named(&'a str),
    Selector(&'a QuerySelector),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        Target::Named(name)
    }
}

impl<'a> From<&'a QuerySelector> for Target<'a> {
    fn from(selector: &'a QuerySelector) -> Self {
        Target::Selector(selector)
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Named(name) => f.write_str(name),
            Target::Selector(selector) => write!(f, "{}", selector),
        }
    }
}

/// Why a primitive did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    /// The selector matched fewer than `index + 1` elements
    NotFound,

    /// The element has `pointer-events: none`
    NotInteractable,

    /// The page could not be reached or replied unexpectedly
    PortError(String),
}

/// Result of one primitive invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Performed,
    Skipped(SkipReason),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => f.write_str("element not found"),
            SkipReason::NotInteractable => f.write_str("element does not accept pointer events"),
            SkipReason::PortError(detail) => write!(f, "page error: {}", detail),
        }
    }
}

impl Outcome {
    pub fn is_performed(&self) -> bool {
        matches!(self, Outcome::Performed)
    }

    pub fn not_found() -> Self {
        Outcome::Skipped(SkipReason::NotFound)
    }
}

/// Pacing of primitives and choreography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTimings {
    /// Upper bound on scroll-into-view attempts
    pub scroll_attempts: u32,

    /// Pause between a scroll request and re-measuring
    pub scroll_interval_ms: u64,

    /// Position change below which scrolling counts as converged
    pub scroll_settle_px: f64,

    /// Pause between polls of a running indicator
    pub query_poll_interval_ms: u64,

    /// Pause after each simulated event
    pub settle_delay_ms: u64,

    /// Lifetime of the ripple marker
    pub ripple_duration_ms: u64,
}

impl Default for InteractionTimings {
    fn default() -> Self {
        Self {
            scroll_attempts: 10,
            scroll_interval_ms: 200,
            scroll_settle_px: 10.0,
            query_poll_interval_ms: 100,
            settle_delay_ms: 50,
            ripple_duration_ms: 600,
        }
    }
}

impl InteractionTimings {
    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn query_poll_interval(&self) -> Duration {
        Duration::from_millis(self.query_poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Inline style properties applied by `highlight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightStyle(BTreeMap<String, String>);

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::new().with("border", "1px solid red")
    }
}

impl HighlightStyle {
    /// An empty style; see [`HighlightStyle::default`] for the red border.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(property.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timings_fill_missing_fields_with_defaults() {
        let timings: InteractionTimings =
            serde_json::from_str(r#"{ "scroll_attempts": 3 }"#).unwrap();
        assert_eq!(timings.scroll_attempts, 3);
        assert_eq!(timings.scroll_interval_ms, 200);
        assert_eq!(timings.query_poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn default_highlight_is_a_red_border() {
        let style = HighlightStyle::default();
        assert_eq!(style.iter().collect::<Vec<_>>(), vec![("border", "1px solid red")]);
    }

    #[test]
    fn outcomes_serialize_with_reasons() {
        let skipped = Outcome::Skipped(SkipReason::PortError("gone".into()));
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            serde_json::json!({ "skipped": { "reason": "port_error", "detail": "gone" } })
        );
        assert_eq!(serde_json::to_value(Outcome::Performed).unwrap(), "performed");
    }
}
