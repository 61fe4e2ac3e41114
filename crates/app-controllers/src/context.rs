use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use action_primitives::{InteractionError, InteractionSession, InteractionTimings, Target};
use dom_query::{DomPort, DomQuery, TEXT_ATTRIBUTE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ControllerError;
use crate::profile::AppProfile;

/// `controllers` section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Rows kept when a result table is reported
    pub max_result_rows: usize,

    /// Directory with `<app>.yaml` profile overrides
    pub selectors_dir: Option<PathBuf>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            max_result_rows: 50,
            selectors_dir: None,
        }
    }
}

/// Everything a controller drives the page with.
pub struct ControllerContext {
    app: String,
    session: InteractionSession,
    profile: AppProfile,
    max_result_rows: usize,
    query_deadline: Option<Duration>,
}

impl ControllerContext {
    pub fn new(app: impl Into<String>, port: Arc<dyn DomPort>, profile: AppProfile) -> Self {
        Self {
            app: app.into(),
            session: InteractionSession::new(port, profile.selectors.clone()),
            profile,
            max_result_rows: ControllerSettings::default().max_result_rows,
            query_deadline: None,
        }
    }

    /// Context with the app's profile loaded and `settings` applied.
    pub fn from_settings(
        app: &str,
        port: Arc<dyn DomPort>,
        settings: &ControllerSettings,
    ) -> Result<Self, ControllerError> {
        let profile = AppProfile::load(app, settings.selectors_dir.as_deref())?;
        Ok(Self::new(app, port, profile).with_max_result_rows(settings.max_result_rows))
    }

    pub fn with_timings(mut self, timings: InteractionTimings) -> Self {
        self.session = self.session.with_timings(timings);
        self
    }

    pub fn with_max_result_rows(mut self, rows: usize) -> Self {
        self.max_result_rows = rows;
        self
    }

    /// Bound waits for running queries; `None` waits for as long as it takes.
    pub fn with_query_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.query_deadline = deadline;
        self
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn profile(&self) -> &AppProfile {
        &self.profile
    }

    pub fn max_result_rows(&self) -> usize {
        self.max_result_rows
    }

    pub fn query(&self, name: &str) -> Result<&DomQuery, ControllerError> {
        self.profile.query(&self.app, name)
    }

    /// Wait for the named running indicator to disappear.
    pub async fn wait_until_idle(&self, indicator: &str) -> Result<u32, InteractionError> {
        let target = Target::Named(indicator);
        match self.query_deadline {
            Some(deadline) => {
                self.session
                    .wait_for_query_execution_within(target, deadline)
                    .await
            }
            None => self.session.wait_for_query_execution(target).await,
        }
    }

    /// Trimmed text of the first match of `name` that has any.
    pub async fn read_text(&self, name: &str) -> Result<Option<String>, ControllerError> {
        let selector = self.session.selectors().require(name)?;
        let query = DomQuery::new(selector.clone()).extract([TEXT_ATTRIBUTE]);
        let records = self.session.resolver().resolve_query(&query).await;
        Ok(records
            .iter()
            .filter_map(|record| record.attr(TEXT_ATTRIBUTE))
            .find(|text| !text.is_empty())
            .map(str::to_string))
    }

    /// DOM-derived snapshot of the app: one entry per `state` query.
    pub async fn snapshot(&self) -> Value {
        let mut state = Map::new();
        state.insert("app".into(), Value::String(self.app.clone()));
        for (name, query) in &self.profile.state {
            let records = self.session.resolver().resolve_query(query).await;
            let value = serde_json::to_value(records).unwrap_or(Value::Null);
            state.insert(name.clone(), value);
        }
        if let Some(element) = self.session.highlighted_element().await {
            state.insert("highlighted".into(), Value::String(element.0));
        }
        debug!(app = %self.app, entries = state.len(), "captured app state");
        Value::Object(state)
    }
}
