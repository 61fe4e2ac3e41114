use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, InsertTextParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::CdpConfig;
use crate::error::{AdapterError, AdapterErrorKind};

/// A single non-text key press, expressed in DevTools terms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStroke {
    /// DOM `key` value, e.g. `ArrowLeft`.
    pub key: String,
    /// DOM `code` value, e.g. `ArrowLeft` or `Enter`.
    pub code: String,
    /// Windows virtual key code, required by Chromium for editing keys.
    pub key_code: i64,
}

impl KeyStroke {
    pub fn new(key: impl Into<String>, code: impl Into<String>, key_code: i64) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            key_code,
        }
    }
}

/// Minimal surface the DOM layer needs from a browser page.
#[async_trait]
pub trait ScriptRuntime: Send + Sync {
    /// Evaluate an expression in the page and return its JSON value.
    /// Promises are awaited; `undefined` comes back as `Value::Null`.
    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError>;

    /// Press and release one key on whatever currently holds focus.
    async fn press_key(&self, stroke: &KeyStroke) -> Result<(), AdapterError>;

    /// Insert text at the focused element as if typed.
    async fn insert_text(&self, text: &str) -> Result<(), AdapterError>;
}

#[derive(Default)]
pub struct NoopRuntime;

#[async_trait]
impl ScriptRuntime for NoopRuntime {
    async fn evaluate(&self, _expression: &str) -> Result<Value, AdapterError> {
        Err(AdapterError::new(AdapterErrorKind::Unavailable)
            .with_hint("runtime not attached to a browser"))
    }

    async fn press_key(&self, stroke: &KeyStroke) -> Result<(), AdapterError> {
        Err(AdapterError::new(AdapterErrorKind::Unavailable)
            .with_hint(format!("cannot press {} without a browser", stroke.key)))
    }

    async fn insert_text(&self, _text: &str) -> Result<(), AdapterError> {
        Err(AdapterError::new(AdapterErrorKind::Unavailable)
            .with_hint("runtime not attached to a browser"))
    }
}

/// Script runtime bound to one tab of a Chromium instance.
pub struct ChromiumRuntime {
    cfg: CdpConfig,
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumRuntime {
    /// Attach to `cfg.websocket_url` when present, otherwise launch a browser.
    pub async fn start(cfg: CdpConfig) -> Result<Self, AdapterError> {
        let (browser, mut handler) = match &cfg.websocket_url {
            Some(url) => {
                info!(target: "cdp-runtime", %url, "attaching to running browser");
                Browser::connect(url.clone()).await.map_err(map_cdp_error)?
            }
            None => {
                if cfg.executable.as_os_str().is_empty() {
                    return Err(AdapterError::new(AdapterErrorKind::Unavailable)
                        .with_hint("no Chrome executable found; set OVERLAY_PILOT_CHROME"));
                }
                info!(
                    target: "cdp-runtime",
                    executable = %cfg.executable.display(),
                    headless = cfg.headless,
                    "launching browser"
                );
                let mut builder = BrowserConfig::builder()
                    .chrome_executable(&cfg.executable)
                    .user_data_dir(&cfg.user_data_dir)
                    .request_timeout(Duration::from_millis(cfg.default_deadline_ms));
                if !cfg.headless {
                    builder = builder.with_head();
                }
                let browser_config = builder.build().map_err(|err| {
                    AdapterError::new(AdapterErrorKind::Internal).with_hint(err)
                })?;
                Browser::launch(browser_config)
                    .await
                    .map_err(map_cdp_error)?
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(target: "cdp-runtime", ?err, "handler event error");
                }
            }
            debug!(target: "cdp-runtime", "handler stream closed");
        });

        let page = select_page(&browser, cfg.page_url_contains.as_deref()).await?;

        Ok(Self {
            cfg,
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser. Attached browsers are only disconnected from.
    pub async fn shutdown(self) -> Result<(), AdapterError> {
        if self.cfg.websocket_url.is_none() {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(map_cdp_error)?;
        }
        self.handler.abort();
        Ok(())
    }

    fn deadline(&self) -> Duration {
        Duration::from_millis(self.cfg.default_deadline_ms)
    }

    async fn dispatch_key(
        &self,
        kind: DispatchKeyEventType,
        stroke: &KeyStroke,
    ) -> Result<(), AdapterError> {
        let params = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(stroke.key.clone())
            .code(stroke.code.clone())
            .windows_virtual_key_code(stroke.key_code)
            .native_virtual_key_code(stroke.key_code)
            .build()
            .map_err(|err| AdapterError::new(AdapterErrorKind::Internal).with_hint(err))?;
        timeout(self.deadline(), self.page.execute(params))
            .await
            .map_err(|_| timeout_error("Input.dispatchKeyEvent"))?
            .map_err(map_cdp_error)?;
        Ok(())
    }
}

#[async_trait]
impl ScriptRuntime for ChromiumRuntime {
    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .user_gesture(true)
            .build()
            .map_err(|err| AdapterError::new(AdapterErrorKind::Internal).with_hint(err))?;

        let response = timeout(self.deadline(), self.page.execute(params))
            .await
            .map_err(|_| timeout_error("Runtime.evaluate"))?
            .map_err(map_cdp_error)?;

        if let Some(details) = &response.result.exception_details {
            return Err(AdapterError::new(AdapterErrorKind::ScriptException)
                .with_hint(details.text.clone()));
        }

        Ok(response
            .result
            .result
            .value
            .clone()
            .unwrap_or(Value::Null))
    }

    async fn press_key(&self, stroke: &KeyStroke) -> Result<(), AdapterError> {
        self.dispatch_key(DispatchKeyEventType::RawKeyDown, stroke)
            .await?;
        self.dispatch_key(DispatchKeyEventType::KeyUp, stroke).await
    }

    async fn insert_text(&self, text: &str) -> Result<(), AdapterError> {
        timeout(self.deadline(), self.page.execute(InsertTextParams::new(text)))
            .await
            .map_err(|_| timeout_error("Input.insertText"))?
            .map_err(map_cdp_error)?;
        Ok(())
    }
}

async fn select_page(browser: &Browser, url_fragment: Option<&str>) -> Result<Page, AdapterError> {
    let pages = browser.pages().await.map_err(map_cdp_error)?;

    if let Some(fragment) = url_fragment {
        for page in &pages {
            let url = page.url().await.map_err(map_cdp_error)?.unwrap_or_default();
            if url.contains(fragment) {
                info!(target: "cdp-runtime", %url, "selected matching tab");
                return Ok(page.clone());
            }
        }
        warn!(
            target: "cdp-runtime",
            fragment,
            "no tab matched the configured url fragment; falling back"
        );
    }

    match pages.into_iter().next() {
        Some(page) => Ok(page),
        None => browser
            .new_page("about:blank")
            .await
            .map_err(map_cdp_error),
    }
}

fn map_cdp_error(err: CdpError) -> AdapterError {
    AdapterError::new(AdapterErrorKind::CdpIo).with_hint(err.to_string())
}

fn timeout_error(method: &str) -> AdapterError {
    AdapterError::new(AdapterErrorKind::Timeout).with_hint(format!("{method} timed out"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_runtime_reports_unavailable() {
        let runtime = NoopRuntime;
        let err = runtime.evaluate("1 + 1").await.unwrap_err();
        assert_eq!(err.kind, AdapterErrorKind::Unavailable);

        let err = runtime
            .press_key(&KeyStroke::new("Enter", "Enter", 13))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Enter"));
    }
}
