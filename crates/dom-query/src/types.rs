//! Core data types for selector resolution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mechanism used to evaluate a [`QuerySelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SelectorKind {
    /// XPath 1.0 expression, evaluated with the scope element as context node
    Xpath,

    /// CSS selector list
    Css,

    /// Elements whose own visible text contains the expression (case-insensitive)
    Text,
}

/// Declarative description of how to locate elements.
///
/// Immutable configuration: resolution is re-run on every use, nothing is
/// cached between calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuerySelector {
    #[serde(rename = "type")]
    pub kind: SelectorKind,

    #[serde(rename = "selector")]
    pub expression: String,
}

impl QuerySelector {
    pub fn new(kind: SelectorKind, expression: impl Into<String>) -> Self {
        Self {
            kind,
            expression: expression.into(),
        }
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::Xpath, expression)
    }

    pub fn css(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::Css, expression)
    }

    pub fn text(expression: impl Into<String>) -> Self {
        Self::new(SelectorKind::Text, expression)
    }
}

impl fmt::Display for QuerySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            SelectorKind::Xpath => "xpath",
            SelectorKind::Css => "css",
            SelectorKind::Text => "text",
        };
        write!(f, "{}:{}", prefix, self.expression)
    }
}

/// Recursive extraction rule: find elements, read attributes off each match,
/// and evaluate every child query with that match as the search context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomQuery {
    pub selector: QuerySelector,

    /// `"text"` reads text content, anything else a DOM attribute
    #[serde(default)]
    pub attributes_to_extract: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, DomQuery>,
}

impl DomQuery {
    pub fn new(selector: QuerySelector) -> Self {
        Self {
            selector,
            attributes_to_extract: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn extract<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_extract
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn child(mut self, name: impl Into<String>, query: DomQuery) -> Self {
        self.children.insert(name.into(), query);
        self
    }
}

/// One value inside a [`DomRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Children(Vec<DomRecord>),
    Attribute(Option<String>),
}

/// Structured data extracted from one matched element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomRecord(BTreeMap<String, RecordValue>);

impl DomRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: RecordValue) {
        self.0.insert(key.into(), value);
    }

    /// Extracted attribute value; `None` when missing or not extracted.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(RecordValue::Attribute(value)) => value.as_deref(),
            _ => None,
        }
    }

    /// Records produced by the named child query (empty when absent).
    pub fn children(&self, name: &str) -> &[DomRecord] {
        match self.0.get(name) {
            Some(RecordValue::Children(records)) => records,
            _ => &[],
        }
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Opaque reference to one live element, valid until the element leaves the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Viewport-relative bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Simulated pointer sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerGesture {
    Click,
    DoubleClick,
}

/// Editing commands applied to whatever currently holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditCommand {
    SelectAll,
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selector_serializes_with_wire_names() {
        let selector = QuerySelector::xpath("//button[@aria-label='Run']");
        let value = serde_json::to_value(&selector).unwrap();
        assert_eq!(
            value,
            json!({ "type": "XPATH", "selector": "//button[@aria-label='Run']" })
        );
        assert_eq!(selector.to_string(), "xpath://button[@aria-label='Run']");
    }

    #[test]
    fn dom_query_parses_nested_children() {
        let query: DomQuery = serde_json::from_value(json!({
            "selector": { "type": "CSS", "selector": "table" },
            "children": {
                "rows": {
                    "selector": { "type": "CSS", "selector": "tr" },
                    "attributes_to_extract": ["text"]
                }
            }
        }))
        .unwrap();
        assert!(query.attributes_to_extract.is_empty());
        assert_eq!(query.children["rows"].attributes_to_extract, vec!["text"]);
    }

    #[test]
    fn record_accessors_distinguish_attributes_and_children() {
        let mut row = DomRecord::new();
        row.insert("text", RecordValue::Attribute(Some("42".into())));
        let mut record = DomRecord::new();
        record.insert("href", RecordValue::Attribute(None));
        record.insert("rows", RecordValue::Children(vec![row]));

        assert_eq!(record.attr("href"), None);
        assert_eq!(record.children("rows").len(), 1);
        assert_eq!(record.children("rows")[0].attr("text"), Some("42"));
        assert!(record.children("missing").is_empty());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({ "href": null, "rows": [ { "text": "42" } ] }));
    }
}
