//! Per-application controllers
//!
//! Each supported host application gets a [`Controller`] that declares its
//! actions in an explicit table and composes primitives and choreography
//! from `action-primitives`. Selector maps and extraction queries live in
//! per-app profiles (`selectors/<app>.yaml`, embedded at build time) that
//! can be overridden from a directory.

mod analytics;
mod bi;
mod context;
mod controller;
pub mod errors;
pub mod ports;
mod profile;
mod render;
mod sheets;

use std::sync::Arc;

use action_registry::ActionTarget;

pub use analytics::{AnalyticsController, UpdateQueryArgs};
pub use bi::{BiController, TableNamesArgs, UpdateSqlQueryArgs};
pub use context::{ControllerContext, ControllerSettings};
pub use controller::Controller;
pub use errors::ControllerError;
pub use ports::{CodeSandbox, SchemaSource, StaticSchemaSource, Unavailable};
pub use profile::AppProfile;
pub use render::ResultTable;
pub use sheets::{
    is_cell_reference, HighlightCellArgs, RunCodeArgs, SetCellValueArgs, SheetsController,
};

/// Ids of every supported app.
pub const APP_IDS: [&str; 3] = [
    BiController::APP_ID,
    AnalyticsController::APP_ID,
    SheetsController::APP_ID,
];

/// External services controllers may call.
#[derive(Clone)]
pub struct Collaborators {
    pub schemas: Arc<dyn SchemaSource>,
    pub sandbox: Arc<dyn CodeSandbox>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            schemas: Arc::new(Unavailable),
            sandbox: Arc::new(Unavailable),
        }
    }
}

/// Build the controller for `ctx.app()` and bind it to its action table.
pub fn bind_controller(
    ctx: ControllerContext,
    collaborators: &Collaborators,
) -> Result<Arc<dyn ActionTarget>, ControllerError> {
    let app = ctx.app().to_string();
    let target: Arc<dyn ActionTarget> = match app.as_str() {
        BiController::APP_ID => {
            Arc::new(BiController::new(ctx, collaborators.schemas.clone()).bind())
        }
        AnalyticsController::APP_ID => {
            Arc::new(AnalyticsController::new(ctx, collaborators.schemas.clone()).bind())
        }
        SheetsController::APP_ID => {
            Arc::new(SheetsController::new(ctx, collaborators.sandbox.clone()).bind())
        }
        _ => return Err(ControllerError::UnknownApp { app: app.clone() }),
    };
    Ok(target)
}
