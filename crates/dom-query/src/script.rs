use std::sync::Arc;

use async_trait::async_trait;
use cdp_adapter::ScriptRuntime;
use serde::Serialize;
use serde_json::Value;

use crate::errors::DomError;
use crate::keys::KeyInput;
use crate::port::DomPort;
use crate::types::{EditCommand, ElementHandle, PointerGesture, QuerySelector, Rect, SelectorKind};

/// Attribute used to tag resolved elements so later calls can find them again.
pub const HANDLE_ATTRIBUTE: &str = "data-overlay-pilot-handle";

/// [`DomPort`] implemented by evaluating JavaScript in a browser tab.
///
/// Every matched element is tagged once with [`HANDLE_ATTRIBUTE`]; the tag
/// value is the handle, so resolving the same element twice yields equal
/// handles.
pub struct ScriptDomPort {
    runtime: Arc<dyn ScriptRuntime>,
}

impl ScriptDomPort {
    pub fn new(runtime: Arc<dyn ScriptRuntime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Arc<dyn ScriptRuntime> {
        &self.runtime
    }

    /// Run `body` with `el` bound to the element behind `element`.
    async fn with_element(&self, element: &ElementHandle, body: &str) -> Result<Value, DomError> {
        let expression = format!(
            r#"(() => {{
            const el = document.querySelector('[{attr}="' + {token} + '"]');
            if (!el) {{ return {{ status: 'detached' }}; }}
            {body}
        }})()"#,
            attr = HANDLE_ATTRIBUTE,
            token = js_literal(element.as_str())?,
            body = body,
        );
        let value = self.runtime.evaluate(&expression).await?;
        expect_ok(value, element)
    }

    async fn run_global(&self, body: &str) -> Result<Value, DomError> {
        let expression = format!("(() => {{ {body} }})()", body = body);
        let value = self.runtime.evaluate(&expression).await?;
        match value.get("status").and_then(Value::as_str) {
            Some("ok") => Ok(value),
            _ => Err(DomError::Protocol(value.to_string())),
        }
    }
}

#[async_trait]
impl DomPort for ScriptDomPort {
    async fn query_all(
        &self,
        selector: &QuerySelector,
        scope: Option<&ElementHandle>,
    ) -> Result<Vec<ElementHandle>, DomError> {
        let kind = match selector.kind {
            SelectorKind::Xpath => "XPATH",
            SelectorKind::Css => "CSS",
            SelectorKind::Text => "TEXT",
        };
        let scope_token = match scope {
            Some(handle) => js_literal(handle.as_str())?,
            None => "null".to_string(),
        };
        let expression = format!(
            r#"(() => {{
            const attr = '{attr}';
            const kind = '{kind}';
            const expr = {expr};
            const scopeToken = {scope};
            const root = scopeToken === null
                ? document
                : document.querySelector('[' + attr + '="' + scopeToken + '"]');
            if (!root) {{ return {{ status: 'detached' }}; }}
            let nodes = [];
            try {{
                if (kind === 'CSS') {{
                    nodes = Array.from(root.querySelectorAll(expr));
                }} else if (kind === 'XPATH') {{
                    const snap = document.evaluate(expr, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
                    for (let i = 0; i < snap.snapshotLength; i++) {{
                        const node = snap.snapshotItem(i);
                        if (node instanceof Element) {{ nodes.push(node); }}
                    }}
                }} else {{
                    const needle = expr.trim().toLowerCase();
                    nodes = Array.from(root.querySelectorAll('*')).filter(el => {{
                        const own = Array.from(el.childNodes)
                            .filter(n => n.nodeType === Node.TEXT_NODE)
                            .map(n => n.textContent || '')
                            .join('')
                            .trim()
                            .toLowerCase();
                        return own.length > 0 && own.includes(needle);
                    }});
                }}
            }} catch (err) {{
                return {{ status: 'invalid', message: String(err) }};
            }}
            const handles = nodes.map(el => {{
                let token = el.getAttribute(attr);
                if (!token) {{
                    window.__overlayPilotSeq = (window.__overlayPilotSeq || 0) + 1;
                    token = 'h' + window.__overlayPilotSeq;
                    el.setAttribute(attr, token);
                }}
                return token;
            }});
            return {{ status: 'ok', handles }};
        }})()"#,
            attr = HANDLE_ATTRIBUTE,
            kind = kind,
            expr = js_literal(&selector.expression)?,
            scope = scope_token,
        );

        let value = self.runtime.evaluate(&expression).await?;
        match value.get("status").and_then(Value::as_str) {
            Some("ok") => {
                let handles = value
                    .get("handles")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(|token| ElementHandle(token.to_string()))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(handles)
            }
            Some("invalid") => Err(DomError::InvalidSelector(format!(
                "{}: {}",
                selector,
                value.get("message").and_then(Value::as_str).unwrap_or("")
            ))),
            Some("detached") => match scope {
                Some(handle) => Err(DomError::Detached(handle.clone())),
                None => Err(DomError::Protocol("document root missing".to_string())),
            },
            _ => Err(DomError::Protocol(value.to_string())),
        }
    }

    async fn text_content(&self, element: &ElementHandle) -> Result<String, DomError> {
        let value = self
            .with_element(
                element,
                "return { status: 'ok', value: (el.innerText ?? el.textContent ?? '') };",
            )
            .await?;
        Ok(string_field(&value, "value").unwrap_or_default())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        let body = format!(
            "return {{ status: 'ok', value: el.getAttribute({name}) }};",
            name = js_literal(name)?
        );
        let value = self.with_element(element, &body).await?;
        Ok(string_field(&value, "value"))
    }

    async fn pointer_events_enabled(&self, element: &ElementHandle) -> Result<bool, DomError> {
        let value = self
            .with_element(
                element,
                "return { status: 'ok', value: getComputedStyle(el).pointerEvents !== 'none' };",
            )
            .await?;
        Ok(value.get("value").and_then(Value::as_bool).unwrap_or(true))
    }

    async fn dispatch_pointer(
        &self,
        element: &ElementHandle,
        gesture: PointerGesture,
    ) -> Result<(), DomError> {
        let double = matches!(gesture, PointerGesture::DoubleClick);
        let body = format!(
            r#"const rect = el.getBoundingClientRect();
            const base = {{
                bubbles: true,
                cancelable: true,
                view: window,
                clientX: rect.left + rect.width / 2,
                clientY: rect.top + rect.height / 2,
                button: 0,
            }};
            const press = (detail) => {{
                el.dispatchEvent(new PointerEvent('pointerdown', {{ ...base, detail, buttons: 1 }}));
                el.dispatchEvent(new MouseEvent('mousedown', {{ ...base, detail, buttons: 1 }}));
                if (typeof el.focus === 'function') {{ el.focus(); }}
                el.dispatchEvent(new PointerEvent('pointerup', {{ ...base, detail }}));
                el.dispatchEvent(new MouseEvent('mouseup', {{ ...base, detail }}));
                el.dispatchEvent(new MouseEvent('click', {{ ...base, detail }}));
            }};
            el.dispatchEvent(new PointerEvent('pointerover', base));
            el.dispatchEvent(new MouseEvent('mouseover', base));
            press(1);
            if ({double}) {{
                press(2);
                el.dispatchEvent(new MouseEvent('dblclick', {{ ...base, detail: 2 }}));
            }}
            return {{ status: 'ok' }};"#,
            double = double,
        );
        self.with_element(element, &body).await.map(|_| ())
    }

    async fn computed_style(
        &self,
        element: &ElementHandle,
        property: &str,
    ) -> Result<String, DomError> {
        let body = format!(
            "return {{ status: 'ok', value: getComputedStyle(el).getPropertyValue({prop}) }};",
            prop = js_literal(property)?
        );
        let value = self.with_element(element, &body).await?;
        Ok(string_field(&value, "value").unwrap_or_default())
    }

    async fn inline_style(
        &self,
        element: &ElementHandle,
        property: &str,
    ) -> Result<String, DomError> {
        let body = format!(
            "return {{ status: 'ok', value: el.style.getPropertyValue({prop}) }};",
            prop = js_literal(property)?
        );
        let value = self.with_element(element, &body).await?;
        Ok(string_field(&value, "value").unwrap_or_default())
    }

    async fn set_inline_style(
        &self,
        element: &ElementHandle,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let body = format!(
            r#"const prop = {prop};
            const value = {value};
            if (value === '') {{ el.style.removeProperty(prop); }} else {{ el.style.setProperty(prop, value); }}
            return {{ status: 'ok' }};"#,
            prop = js_literal(property)?,
            value = js_literal(value)?,
        );
        self.with_element(element, &body).await.map(|_| ())
    }

    async fn bounding_rect(&self, element: &ElementHandle) -> Result<Rect, DomError> {
        let value = self
            .with_element(
                element,
                r#"const r = el.getBoundingClientRect();
                return { status: 'ok', x: r.left, y: r.top, width: r.width, height: r.height };"#,
            )
            .await?;
        let field = |name: &str| value.get(name).and_then(Value::as_f64).unwrap_or(0.0);
        Ok(Rect::new(
            field("x"),
            field("y"),
            field("width"),
            field("height"),
        ))
    }

    async fn viewport_height(&self) -> Result<f64, DomError> {
        let value = self
            .run_global("return { status: 'ok', value: window.innerHeight };")
            .await?;
        value
            .get("value")
            .and_then(Value::as_f64)
            .ok_or_else(|| DomError::Protocol(value.to_string()))
    }

    async fn scroll_to_center(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.with_element(
            element,
            r#"el.scrollIntoView({ behavior: 'auto', block: 'center', inline: 'nearest' });
            return { status: 'ok' };"#,
        )
        .await
        .map(|_| ())
    }

    async fn send_keys(
        &self,
        element: Option<&ElementHandle>,
        keys: &[KeyInput],
    ) -> Result<(), DomError> {
        if let Some(element) = element {
            self.with_element(
                element,
                "if (typeof el.focus === 'function') { el.focus(); } return { status: 'ok' };",
            )
            .await?;
        }
        for input in keys {
            match input {
                KeyInput::Text(text) => self.runtime.insert_text(text).await?,
                KeyInput::Key(key) => self.runtime.press_key(&key.stroke()).await?,
            }
        }
        Ok(())
    }

    async fn exec_edit_command(&self, command: EditCommand) -> Result<(), DomError> {
        let name = match command {
            EditCommand::SelectAll => "selectAll",
            EditCommand::Delete => "delete",
        };
        let body = format!(
            "document.execCommand('{name}', false); return {{ status: 'ok' }};",
            name = name
        );
        self.run_global(&body).await.map(|_| ())
    }

    async fn drop_text(&self, element: &ElementHandle, text: &str) -> Result<(), DomError> {
        let body = format!(
            r#"const data = new DataTransfer();
            data.setData('text/plain', {text});
            const rect = el.getBoundingClientRect();
            const init = {{
                bubbles: true,
                cancelable: true,
                dataTransfer: data,
                clientX: rect.left + rect.width / 2,
                clientY: rect.top + rect.height / 2,
            }};
            for (const type of ['dragenter', 'dragover', 'drop']) {{
                el.dispatchEvent(new DragEvent(type, init));
            }}
            return {{ status: 'ok' }};"#,
            text = js_literal(text)?,
        );
        self.with_element(element, &body).await.map(|_| ())
    }

    async fn show_ripple(&self, x: f64, y: f64, duration_ms: u64) -> Result<(), DomError> {
        let body = format!(
            r#"const dot = document.createElement('div');
            Object.assign(dot.style, {{
                position: 'fixed',
                left: ({x} - 20) + 'px',
                top: ({y} - 20) + 'px',
                width: '40px',
                height: '40px',
                borderRadius: '50%',
                background: 'rgba(255, 0, 0, 0.35)',
                pointerEvents: 'none',
                zIndex: '2147483647',
                transition: 'transform {ms}ms ease-out, opacity {ms}ms ease-out',
            }});
            document.body.appendChild(dot);
            requestAnimationFrame(() => {{
                dot.style.transform = 'scale(2.5)';
                dot.style.opacity = '0';
            }});
            setTimeout(() => dot.remove(), {ms});
            return {{ status: 'ok' }};"#,
            x = x,
            y = y,
            ms = duration_ms,
        );
        self.run_global(&body).await.map(|_| ())
    }
}

fn js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String, DomError> {
    serde_json::to_string(value)
        .map_err(|err| DomError::Protocol(format!("failed to encode script argument: {}", err)))
}

fn expect_ok(value: Value, element: &ElementHandle) -> Result<Value, DomError> {
    match value.get("status").and_then(Value::as_str) {
        Some("ok") => Ok(value),
        Some("detached") => Err(DomError::Detached(element.clone())),
        _ => Err(DomError::Protocol(value.to_string())),
    }
}

fn string_field(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdp_adapter::{AdapterError, KeyStroke};
    use parking_lot::Mutex;
    use serde_json::json;

    /// Records every expression and answers from a queue of canned replies.
    #[derive(Default)]
    struct ScriptedRuntime {
        expressions: Mutex<Vec<String>>,
        replies: Mutex<Vec<Value>>,
        keys: Mutex<Vec<String>>,
        inserted: Mutex<Vec<String>>,
    }

    impl ScriptedRuntime {
        fn reply(self, value: Value) -> Self {
            self.replies.lock().push(value);
            self
        }
    }

    #[async_trait]
    impl ScriptRuntime for ScriptedRuntime {
        async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError> {
            self.expressions.lock().push(expression.to_string());
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                Ok(json!({ "status": "ok" }))
            } else {
                Ok(replies.remove(0))
            }
        }

        async fn press_key(&self, stroke: &KeyStroke) -> Result<(), AdapterError> {
            self.keys.lock().push(stroke.key.clone());
            Ok(())
        }

        async fn insert_text(&self, text: &str) -> Result<(), AdapterError> {
            self.inserted.lock().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn query_all_returns_tagged_handles() {
        let runtime = Arc::new(
            ScriptedRuntime::default().reply(json!({ "status": "ok", "handles": ["h1", "h2"] })),
        );
        let port = ScriptDomPort::new(runtime.clone());
        let handles = port
            .query_all(&QuerySelector::xpath("//tr"), None)
            .await
            .unwrap();
        assert_eq!(
            handles,
            vec![ElementHandle("h1".into()), ElementHandle("h2".into())]
        );
        let script = runtime.expressions.lock()[0].clone();
        assert!(script.contains("const kind = 'XPATH'"));
        assert!(script.contains("const scopeToken = null"));
        assert!(script.contains(HANDLE_ATTRIBUTE));
    }

    #[tokio::test]
    async fn scoped_query_embeds_scope_token() {
        let runtime = Arc::new(
            ScriptedRuntime::default().reply(json!({ "status": "ok", "handles": [] })),
        );
        let port = ScriptDomPort::new(runtime.clone());
        let scope = ElementHandle("h7".into());
        let handles = port
            .query_all(&QuerySelector::css("td"), Some(&scope))
            .await
            .unwrap();
        assert!(handles.is_empty());
        assert!(runtime.expressions.lock()[0].contains("const scopeToken = \"h7\""));
    }

    #[tokio::test]
    async fn invalid_selectors_surface_as_port_errors() {
        let runtime = Arc::new(
            ScriptedRuntime::default()
                .reply(json!({ "status": "invalid", "message": "SyntaxError" })),
        );
        let port = ScriptDomPort::new(runtime);
        let err = port
            .query_all(&QuerySelector::css("##"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector(_)));
    }

    #[tokio::test]
    async fn detached_handles_are_reported() {
        let runtime =
            Arc::new(ScriptedRuntime::default().reply(json!({ "status": "detached" })));
        let port = ScriptDomPort::new(runtime);
        let handle = ElementHandle("h3".into());
        let err = port.text_content(&handle).await.unwrap_err();
        assert!(matches!(err, DomError::Detached(h) if h == handle));
    }

    #[tokio::test]
    async fn send_keys_splits_text_and_trusted_keys() {
        let runtime = Arc::new(ScriptedRuntime::default());
        let port = ScriptDomPort::new(runtime.clone());
        let keys = crate::keys::parse_key_sequence("A1{Enter}");
        port.send_keys(Some(&ElementHandle("h1".into())), &keys)
            .await
            .unwrap();
        assert_eq!(runtime.inserted.lock().clone(), vec!["A1".to_string()]);
        assert_eq!(runtime.keys.lock().clone(), vec!["Enter".to_string()]);
        assert!(runtime.expressions.lock()[0].contains("el.focus()"));
    }

    #[tokio::test]
    async fn drop_text_escapes_payload() {
        let runtime = Arc::new(ScriptedRuntime::default());
        let port = ScriptDomPort::new(runtime.clone());
        port.drop_text(&ElementHandle("h1".into()), "select \"x\"\nfrom t")
            .await
            .unwrap();
        let script = runtime.expressions.lock()[0].clone();
        assert!(script.contains(r#"data.setData('text/plain', "select \"x\"\nfrom t")"#));
        assert!(script.contains("'dragenter', 'dragover', 'drop'"));
    }
}
