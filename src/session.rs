//! Wiring of one app session: page port, controller and dispatcher

use std::sync::Arc;

use action_registry::{
    ActionDescriptor, ActionRecord, ActionRequest, DispatchError, Dispatcher, SerialDispatcher,
};
use anyhow::{Context, Result};
use app_controllers::{bind_controller, Collaborators, ControllerContext, StaticSchemaSource};
use dom_query::DomPort;
use tracing::info;

use crate::config::{self, Config};

/// Collaborators configured in `collaborators`; absent ones stay unavailable.
pub async fn collaborators(config: &Config) -> Result<Collaborators> {
    let mut collaborators = Collaborators::default();
    if let Some(path) = &config.collaborators.schema_file {
        let tables = config::load_schema_file(path).await?;
        info!(tables = tables.len(), path = %path.display(), "loaded table schemas");
        collaborators.schemas = Arc::new(StaticSchemaSource::new(tables));
    }
    Ok(collaborators)
}

/// Dispatcher for one app, serial or not as configured.
pub struct AppSession {
    app: String,
    dispatcher: Arc<Dispatcher>,
    serial: Option<SerialDispatcher>,
}

impl AppSession {
    pub fn open(
        app: &str,
        port: Arc<dyn DomPort>,
        config: &Config,
        collaborators: &Collaborators,
    ) -> Result<Self> {
        let ctx = ControllerContext::from_settings(app, port, &config.controllers)
            .with_context(|| format!("loading the '{}' profile", app))?
            .with_timings(config.interaction.clone())
            .with_query_deadline(config.dispatcher.query_deadline());
        let target = bind_controller(ctx, collaborators)?;
        let dispatcher = Arc::new(Dispatcher::with_target(target));
        let serial = config
            .dispatcher
            .serialize
            .then(|| SerialDispatcher::new(dispatcher.clone()));
        Ok(Self {
            app: app.to_string(),
            dispatcher,
            serial,
        })
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn is_serial(&self) -> bool {
        self.serial.is_some()
    }

    pub fn catalogue(&self) -> Vec<ActionDescriptor> {
        self.dispatcher.catalogue()
    }

    pub fn prompt_block(&self) -> String {
        self.dispatcher.prompt_block()
    }

    pub async fn execute(&self, request: ActionRequest) -> Result<ActionRecord, DispatchError> {
        match &self.serial {
            Some(serial) => serial.execute(request).await,
            None => self.dispatcher.execute(request).await,
        }
    }
}
