//! In-memory [`DomPort`] for tests.
//!
//! [`FixtureDom`] keeps a small element tree with just enough behaviour to
//! exercise interaction choreography: layout rectangles, inline and computed
//! styles, focus with a text cursor and selection, a configurable scroll
//! model, scheduled removals, and a log of every side effect.

mod matcher;

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use cdp_adapter::{AdapterError, AdapterErrorKind};
use parking_lot::Mutex;

use crate::errors::DomError;
use crate::keys::{KeyInput, SpecialKey};
use crate::port::DomPort;
use crate::types::{
    EditCommand, ElementHandle, PointerGesture, QuerySelector, Rect, SelectorKind,
};

const HANDLE_PREFIX: &str = "node-";
const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Index of a node in a [`FixtureDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn handle(&self) -> ElementHandle {
        ElementHandle(format!("{}{}", HANDLE_PREFIX, self.0))
    }
}

/// How elements move when asked to scroll into the center of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollModel {
    /// The element lands centered on the first request.
    Settle,
    /// The element moves by `step` pixels per request and never settles.
    Drift { step: f64 },
}

/// Side effects recorded by [`FixtureDom`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    Pointer {
        node: NodeId,
        gesture: PointerGesture,
    },
    Scroll {
        node: NodeId,
    },
    Keys {
        node: Option<NodeId>,
        keys: Vec<KeyInput>,
    },
    EditCommand(EditCommand),
    Drop {
        node: NodeId,
        text: String,
    },
    StyleChanged {
        node: NodeId,
        property: String,
        value: String,
    },
    Ripple {
        x: f64,
        y: f64,
    },
}

/// Builder for one element appended with [`FixtureDom::append`].
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    inline_style: BTreeMap<String, String>,
    computed_style: BTreeMap<String, String>,
    rect: Rect,
    pointer_events: bool,
    editable: bool,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            text: String::new(),
            inline_style: BTreeMap::new(),
            computed_style: BTreeMap::new(),
            rect: Rect::new(0.0, 0.0, 100.0, 20.0),
            pointer_events: true,
            editable: false,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Inline style property.
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.inline_style.insert(property.into(), value.into());
        self
    }

    /// Computed style property, shadowed by an inline value of the same name.
    pub fn computed(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.computed_style.insert(property.into(), value.into());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Place the element with its top edge at `y`.
    pub fn at(mut self, y: f64) -> Self {
        self.rect.y = y;
        self
    }

    pub fn pointer_events(mut self, enabled: bool) -> Self {
        self.pointer_events = enabled;
        self
    }

    /// Accept keyboard input, drops and edit commands.
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) tag: String,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    attached: bool,
    inline_style: BTreeMap<String, String>,
    computed_style: BTreeMap<String, String>,
    rect: Rect,
    pointer_events: bool,
    editable: bool,
    cursor: usize,
    selection: Option<(usize, usize)>,
}

impl Node {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            attached: true,
            inline_style: BTreeMap::new(),
            computed_style: BTreeMap::new(),
            rect: Rect::default(),
            pointer_events: true,
            editable: false,
            cursor: 0,
            selection: None,
        }
    }

    pub(crate) fn is_document(&self) -> bool {
        self.tag == "#document"
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn replace_range(&mut self, start: usize, end: usize, insert: &str) {
        let chars: Vec<char> = self.text.chars().collect();
        let start = start.min(chars.len());
        let end = end.clamp(start, chars.len());
        let mut text: String = chars[..start].iter().collect();
        text.push_str(insert);
        text.extend(chars[end..].iter());
        self.text = text;
        self.cursor = start + insert.chars().count();
        self.selection = None;
    }

    fn insert(&mut self, text: &str) {
        match self.selection {
            Some((start, end)) => self.replace_range(start, end, text),
            None => self.replace_range(self.cursor, self.cursor, text),
        }
    }

    fn delete_backward(&mut self) {
        match self.selection {
            Some((start, end)) => self.replace_range(start, end, ""),
            None if self.cursor > 0 => self.replace_range(self.cursor - 1, self.cursor, ""),
            None => {}
        }
    }

    fn delete_forward(&mut self) {
        match self.selection {
            Some((start, end)) => self.replace_range(start, end, ""),
            None if self.cursor < self.char_len() => {
                self.replace_range(self.cursor, self.cursor + 1, "")
            }
            None => {}
        }
    }

    fn press(&mut self, key: SpecialKey) {
        let len = self.char_len();
        match key {
            SpecialKey::ArrowLeft => {
                self.cursor = match self.selection.take() {
                    Some((start, _)) => start,
                    None => self.cursor.saturating_sub(1),
                };
            }
            SpecialKey::ArrowRight => {
                self.cursor = match self.selection.take() {
                    Some((_, end)) => end,
                    None => (self.cursor + 1).min(len),
                };
            }
            SpecialKey::Home | SpecialKey::ArrowUp => {
                self.selection = None;
                self.cursor = 0;
            }
            SpecialKey::End | SpecialKey::ArrowDown => {
                self.selection = None;
                self.cursor = len;
            }
            SpecialKey::Backspace => self.delete_backward(),
            SpecialKey::Delete => self.delete_forward(),
            SpecialKey::Enter | SpecialKey::Tab | SpecialKey::Escape => {}
        }
    }
}

struct ScheduledRemoval {
    selector: QuerySelector,
    nth: usize,
    node: NodeId,
}

struct Inner {
    nodes: Vec<Node>,
    viewport_height: f64,
    scroll_model: ScrollModel,
    focused: Option<NodeId>,
    removals: Vec<ScheduledRemoval>,
    query_counts: HashMap<QuerySelector, usize>,
    events: Vec<DomEvent>,
    unavailable: bool,
}

impl Inner {
    fn check_available(&self) -> Result<(), DomError> {
        if self.unavailable {
            Err(DomError::Runtime(AdapterError::new(AdapterErrorKind::Unavailable)
                .with_hint("fixture page is unavailable")))
        } else {
            Ok(())
        }
    }

    fn lookup(&self, handle: &ElementHandle) -> Result<NodeId, DomError> {
        self.check_available()?;
        handle
            .as_str()
            .strip_prefix(HANDLE_PREFIX)
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|index| self.nodes.get(*index).map_or(false, |node| node.attached))
            .map(NodeId)
            .ok_or_else(|| DomError::Detached(handle.clone()))
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
        for node in matcher::document_order(&self.nodes, id) {
            self.nodes[node.0].attached = false;
            if self.focused == Some(node) {
                self.focused = None;
            }
        }
    }

    /// Move focus to `id`; the cursor starts at the end of its text.
    fn focus(&mut self, id: NodeId) {
        if self.focused != Some(id) {
            self.focused = Some(id);
            let node = self.node_mut(id);
            node.cursor = node.char_len();
            node.selection = None;
        }
    }

    fn focused_editable(&mut self) -> Option<&mut Node> {
        let id = self.focused?;
        let node = &mut self.nodes[id.0];
        if node.editable {
            Some(node)
        } else {
            None
        }
    }

    fn style_value(&self, id: NodeId, property: &str) -> String {
        let node = self.node(id);
        if let Some(value) = node.inline_style.get(property) {
            return value.clone();
        }
        if let Some(value) = node.computed_style.get(property) {
            return value.clone();
        }
        match property {
            "display" => "block".to_string(),
            "visibility" => "visible".to_string(),
            "pointer-events" if !node.pointer_events => "none".to_string(),
            "pointer-events" => "auto".to_string(),
            _ => String::new(),
        }
    }
}

/// Deterministic in-memory page.
pub struct FixtureDom {
    inner: Mutex<Inner>,
}

impl Default for FixtureDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDom {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                nodes: vec![Node::new("#document")],
                viewport_height: DEFAULT_VIEWPORT_HEIGHT,
                scroll_model: ScrollModel::Settle,
                focused: None,
                removals: Vec::new(),
                query_counts: HashMap::new(),
                events: Vec::new(),
                unavailable: false,
            }),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append(&self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let mut inner = self.inner.lock();
        let id = NodeId(inner.nodes.len());
        let attached = inner.node(parent).attached;
        let len = spec.text.chars().count();
        inner.nodes.push(Node {
            tag: spec.tag,
            attrs: spec.attrs,
            text: spec.text,
            children: Vec::new(),
            parent: Some(parent),
            attached,
            inline_style: spec.inline_style,
            computed_style: spec.computed_style,
            rect: spec.rect,
            pointer_events: spec.pointer_events,
            editable: spec.editable,
            cursor: len,
            selection: None,
        });
        inner.node_mut(parent).children.push(id);
        id
    }

    pub fn remove(&self, node: NodeId) {
        self.inner.lock().detach(node);
    }

    /// Remove `node` right before the `nth` (1-based) evaluation of `selector`.
    pub fn remove_on_query(&self, selector: &QuerySelector, nth: usize, node: NodeId) {
        self.inner.lock().removals.push(ScheduledRemoval {
            selector: selector.clone(),
            nth,
            node,
        });
    }

    /// How many times `selector` has been evaluated.
    pub fn query_count(&self, selector: &QuerySelector) -> usize {
        self.inner
            .lock()
            .query_counts
            .get(selector)
            .copied()
            .unwrap_or(0)
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.inner.lock().viewport_height = height;
    }

    pub fn set_scroll_model(&self, model: ScrollModel) {
        self.inner.lock().scroll_model = model;
    }

    /// Make every port call fail as if the browser went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }

    pub fn set_text(&self, node: NodeId, text: impl Into<String>) {
        let mut inner = self.inner.lock();
        let node = inner.node_mut(node);
        node.text = text.into();
        node.cursor = node.char_len();
        node.selection = None;
    }

    pub fn set_attribute(&self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.inner
            .lock()
            .node_mut(node)
            .attrs
            .insert(name.into(), value.into());
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.inner.lock().node_mut(node).rect = rect;
    }

    /// Own text (the value of an editable element).
    pub fn text(&self, node: NodeId) -> String {
        self.inner.lock().node(node).text.clone()
    }

    pub fn text_content(&self, node: NodeId) -> String {
        matcher::text_content(&self.inner.lock().nodes, node)
    }

    pub fn inline_style_of(&self, node: NodeId, property: &str) -> Option<String> {
        self.inner.lock().node(node).inline_style.get(property).cloned()
    }

    pub fn rect_of(&self, node: NodeId) -> Rect {
        self.inner.lock().node(node).rect
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.inner.lock().focused
    }

    pub fn selection(&self, node: NodeId) -> Option<(usize, usize)> {
        self.inner.lock().node(node).selection
    }

    pub fn cursor(&self, node: NodeId) -> usize {
        self.inner.lock().node(node).cursor
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.inner.lock().node(node).attached
    }

    pub fn events(&self) -> Vec<DomEvent> {
        self.inner.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.inner.lock().events.clear();
    }
}

#[async_trait]
impl DomPort for FixtureDom {
    async fn query_all(
        &self,
        selector: &QuerySelector,
        scope: Option<&ElementHandle>,
    ) -> Result<Vec<ElementHandle>, DomError> {
        let mut inner = self.inner.lock();
        inner.check_available()?;

        let count = {
            let entry = inner.query_counts.entry(selector.clone()).or_insert(0);
            *entry += 1;
            *entry
        };
        let due: Vec<NodeId> = inner
            .removals
            .iter()
            .filter(|r| r.nth == count && &r.selector == selector)
            .map(|r| r.node)
            .collect();
        for node in due {
            inner.detach(node);
        }

        let root = NodeId(0);
        let context = match scope {
            Some(handle) => inner.lookup(handle)?,
            None => root,
        };
        let matches = match selector.kind {
            SelectorKind::Css => matcher::select_css(&inner.nodes, context, &selector.expression),
            SelectorKind::Xpath => {
                matcher::select_xpath(&inner.nodes, root, context, &selector.expression)
            }
            SelectorKind::Text => Ok(matcher::select_text(
                &inner.nodes,
                context,
                &selector.expression,
            )),
        }
        .map_err(|reason| DomError::InvalidSelector(format!("{}: {}", selector, reason)))?;

        Ok(matches.into_iter().map(|id| id.handle()).collect())
    }

    async fn text_content(&self, element: &ElementHandle) -> Result<String, DomError> {
        let inner = self.inner.lock();
        let id = inner.lookup(element)?;
        Ok(matcher::text_content(&inner.nodes, id))
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        let inner = self.inner.lock();
        let id = inner.lookup(element)?;
        Ok(inner.node(id).attrs.get(name).cloned())
    }

    async fn pointer_events_enabled(&self, element: &ElementHandle) -> Result<bool, DomError> {
        let inner = self.inner.lock();
        let id = inner.lookup(element)?;
        Ok(inner.style_value(id, "pointer-events") != "none")
    }

    async fn dispatch_pointer(
        &self,
        element: &ElementHandle,
        gesture: PointerGesture,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        let id = inner.lookup(element)?;
        inner.focus(id);
        if gesture == PointerGesture::DoubleClick {
            let node = inner.node_mut(id);
            if node.editable {
                node.selection = Some((0, node.char_len()));
            }
        }
        inner.events.push(DomEvent::Pointer { node: id, gesture });
        Ok(())
    }

    async fn computed_style(
        &self,
        element: &ElementHandle,
        property: &str,
    ) -> Result<String, DomError> {
        let inner = self.inner.lock();
        let id = inner.lookup(element)?;
        Ok(inner.style_value(id, property))
    }

    async fn inline_style(
        &self,
        element: &ElementHandle,
        property: &str,
    ) -> Result<String, DomError> {
        let inner = self.inner.lock();
        let id = inner.lookup(element)?;
        Ok(inner
            .node(id)
            .inline_style
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_inline_style(
        &self,
        element: &ElementHandle,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        let id = inner.lookup(element)?;
        let styles = &mut inner.node_mut(id).inline_style;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
        inner.events.push(DomEvent::StyleChanged {
            node: id,
            property: property.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn bounding_rect(&self, element: &ElementHandle) -> Result<Rect, DomError> {
        let inner = self.inner.lock();
        let id = inner.lookup(element)?;
        Ok(inner.node(id).rect)
    }

    async fn viewport_height(&self) -> Result<f64, DomError> {
        let inner = self.inner.lock();
        inner.check_available()?;
        Ok(inner.viewport_height)
    }

    async fn scroll_to_center(&self, element: &ElementHandle) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        let id = inner.lookup(element)?;
        let viewport = inner.viewport_height;
        let model = inner.scroll_model;
        let rect = &mut inner.node_mut(id).rect;
        match model {
            ScrollModel::Settle => rect.y = (viewport - rect.height) / 2.0,
            ScrollModel::Drift { step } => rect.y += step,
        }
        inner.events.push(DomEvent::Scroll { node: id });
        Ok(())
    }

    async fn send_keys(
        &self,
        element: Option<&ElementHandle>,
        keys: &[KeyInput],
    ) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.check_available()?;
        if let Some(handle) = element {
            let id = inner.lookup(handle)?;
            inner.focus(id);
        }
        if let Some(node) = inner.focused_editable() {
            for input in keys {
                match input {
                    KeyInput::Text(text) => node.insert(text),
                    KeyInput::Key(key) => node.press(*key),
                }
            }
        }
        let node = inner.focused;
        inner.events.push(DomEvent::Keys {
            node,
            keys: keys.to_vec(),
        });
        Ok(())
    }

    async fn exec_edit_command(&self, command: EditCommand) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.check_available()?;
        if let Some(node) = inner.focused_editable() {
            match command {
                EditCommand::SelectAll => node.selection = Some((0, node.char_len())),
                EditCommand::Delete => node.delete_backward(),
            }
        }
        inner.events.push(DomEvent::EditCommand(command));
        Ok(())
    }

    async fn drop_text(&self, element: &ElementHandle, text: &str) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        let id = inner.lookup(element)?;
        if inner.node(id).editable {
            if inner.focused != Some(id) {
                inner.focus(id);
            }
            inner.node_mut(id).insert(text);
        }
        inner.events.push(DomEvent::Drop {
            node: id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn show_ripple(&self, x: f64, y: f64, _duration_ms: u64) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.check_available()?;
        inner.events.push(DomEvent::Ripple { x, y });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::parse_key_sequence;

    fn editor() -> (FixtureDom, NodeId) {
        let dom = FixtureDom::new();
        let body = dom.append(dom.root(), ElementSpec::new("body"));
        let input = dom.append(body, ElementSpec::new("div").class("editor").text("old").editable());
        (dom, input)
    }

    #[tokio::test]
    async fn handles_are_stable_and_detach_on_removal() {
        let (dom, input) = editor();
        let selector = QuerySelector::css(".editor");
        let first = dom.query_all(&selector, None).await.unwrap();
        let second = dom.query_all(&selector, None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![input.handle()]);

        dom.remove(input);
        assert!(dom.query_all(&selector, None).await.unwrap().is_empty());
        let err = DomPort::text_content(&dom, &input.handle()).await.unwrap_err();
        assert!(matches!(err, DomError::Detached(_)));
        assert_eq!(dom.query_count(&selector), 3);
    }

    #[tokio::test]
    async fn scheduled_removal_fires_before_the_nth_query() {
        let (dom, input) = editor();
        let selector = QuerySelector::css(".editor");
        dom.remove_on_query(&selector, 2, input);
        assert_eq!(dom.query_all(&selector, None).await.unwrap().len(), 1);
        assert!(dom.query_all(&selector, None).await.unwrap().is_empty());
        assert!(!dom.is_attached(input));
    }

    #[tokio::test]
    async fn typing_edits_the_focused_element() {
        let (dom, input) = editor();
        dom.send_keys(Some(&input.handle()), &parse_key_sequence("{Backspace}n{ArrowLeft}x"))
            .await
            .unwrap();
        assert_eq!(dom.text(input), "olxn");
        assert_eq!(dom.focused(), Some(input));
    }

    #[tokio::test]
    async fn double_click_selects_and_drop_replaces_selection() {
        let (dom, input) = editor();
        dom.dispatch_pointer(&input.handle(), PointerGesture::DoubleClick)
            .await
            .unwrap();
        assert_eq!(dom.selection(input), Some((0, 3)));
        dom.drop_text(&input.handle(), "new").await.unwrap();
        assert_eq!(dom.text(input), "new");
        assert_eq!(dom.cursor(input), 3);
    }

    #[tokio::test]
    async fn inline_styles_shadow_computed_styles() {
        let dom = FixtureDom::new();
        let el = dom.append(
            dom.root(),
            ElementSpec::new("div").computed("display", "flex").pointer_events(false),
        );
        let handle = el.handle();
        assert_eq!(dom.computed_style(&handle, "display").await.unwrap(), "flex");
        assert!(!dom.pointer_events_enabled(&handle).await.unwrap());

        dom.set_inline_style(&handle, "display", "none").await.unwrap();
        assert_eq!(dom.computed_style(&handle, "display").await.unwrap(), "none");
        dom.set_inline_style(&handle, "display", "").await.unwrap();
        assert_eq!(dom.inline_style(&handle, "display").await.unwrap(), "");
        assert_eq!(dom.computed_style(&handle, "display").await.unwrap(), "flex");
    }

    #[tokio::test]
    async fn unavailable_page_fails_every_call() {
        let (dom, input) = editor();
        dom.set_unavailable(true);
        assert!(dom.query_all(&QuerySelector::css("div"), None).await.is_err());
        assert!(dom.bounding_rect(&input.handle()).await.is_err());
        assert!(dom.viewport_height().await.is_err());
    }
}
