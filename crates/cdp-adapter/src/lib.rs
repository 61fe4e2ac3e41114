//! Chromium DevTools Protocol runtime for overlay-pilot.
//!
//! The automation layers above never speak CDP directly. They hand JavaScript
//! expressions and key strokes to a [`ScriptRuntime`], which this crate
//! implements on top of `chromiumoxide` ([`ChromiumRuntime`]) and as an inert
//! stand-in ([`NoopRuntime`]).

mod chrome;
mod runtime;

pub use config::CdpConfig;
pub use error::{AdapterError, AdapterErrorKind};
pub use runtime::{ChromiumRuntime, KeyStroke, NoopRuntime, ScriptRuntime};

pub mod error {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use thiserror::Error;

    /// High-level error categories surfaced by the runtime.
    #[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
    pub enum AdapterErrorKind {
        #[error("browser unavailable")]
        Unavailable,
        #[error("cdp i/o failure")]
        CdpIo,
        #[error("script raised an exception")]
        ScriptException,
        #[error("deadline exceeded")]
        Timeout,
        #[error("internal error")]
        Internal,
    }

    /// Enriched error metadata passed back to higher layers.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AdapterError {
        pub kind: AdapterErrorKind,
        pub hint: Option<String>,
        pub retriable: bool,
    }

    impl fmt::Display for AdapterError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.kind)?;
            if let Some(hint) = &self.hint {
                write!(f, ": {}", hint)?;
            }
            Ok(())
        }
    }

    impl std::error::Error for AdapterError {}

    impl AdapterError {
        pub fn new(kind: AdapterErrorKind) -> Self {
            let retriable = matches!(kind, AdapterErrorKind::CdpIo | AdapterErrorKind::Timeout);
            Self {
                kind,
                hint: None,
                retriable,
            }
        }

        pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
            self.hint = Some(hint.into());
            self
        }

        pub fn retriable(mut self, flag: bool) -> Self {
            self.retriable = flag;
            self
        }
    }
}

pub mod config {
    use serde::{Deserialize, Serialize};
    use std::{
        env,
        path::{Path, PathBuf},
    };

    /// Configuration for attaching to (or launching) the browser that hosts
    /// the third-party application.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CdpConfig {
        pub executable: PathBuf,
        pub user_data_dir: PathBuf,
        pub headless: bool,
        /// Upper bound for a single protocol round trip.
        pub default_deadline_ms: u64,
        /// DevTools websocket of an already running browser. When set the
        /// runtime attaches instead of launching.
        pub websocket_url: Option<String>,
        /// Pick the first tab whose URL contains this fragment.
        pub page_url_contains: Option<String>,
    }

    impl Default for CdpConfig {
        fn default() -> Self {
            Self {
                executable: default_chrome_path(),
                user_data_dir: default_profile_dir(),
                headless: resolve_headless_default(),
                default_deadline_ms: 30_000,
                websocket_url: resolve_websocket_url(),
                page_url_contains: None,
            }
        }
    }

    fn resolve_headless_default() -> bool {
        // "0", "false", "no", "off" means headful
        match env::var("OVERLAY_PILOT_HEADLESS") {
            Ok(value) => {
                let lower = value.to_ascii_lowercase();
                !matches!(lower.as_str(), "0" | "false" | "no" | "off")
            }
            Err(_) => false,
        }
    }

    fn resolve_websocket_url() -> Option<String> {
        match env::var("OVERLAY_PILOT_CDP_URL") {
            Ok(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(_) => None,
        }
    }

    fn default_chrome_path() -> PathBuf {
        crate::chrome::locate(|key| env::var(key).ok()).unwrap_or_default()
    }

    fn default_profile_dir() -> PathBuf {
        if let Ok(path) = env::var("OVERLAY_PILOT_CHROME_PROFILE") {
            return PathBuf::from(path);
        }

        let default = Path::new("./.overlay-pilot-profile");
        default.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_hint() {
        let err = AdapterError::new(AdapterErrorKind::ScriptException).with_hint("boom");
        assert_eq!(err.to_string(), "script raised an exception: boom");
        assert!(!err.retriable);
        assert!(AdapterError::new(AdapterErrorKind::Timeout).retriable);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let cfg: CdpConfig = serde_json::from_str(r#"{"default_deadline_ms": 500}"#).unwrap();
        assert_eq!(cfg.default_deadline_ms, 500);
        assert!(cfg.page_url_contains.is_none());
    }
}
