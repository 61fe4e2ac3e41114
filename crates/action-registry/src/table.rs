use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use futures::future::{self, BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::content::ActionContent;
use crate::metadata::{ActionDescriptor, ActionMetadata, RenderedBody};

pub const MARK_TASK_DONE: &str = "markTaskDone";
pub const TALK_TO_USER: &str = "talkToUser";

pub type ActionFuture = BoxFuture<'static, anyhow::Result<ActionContent>>;

type Handler<C> = Arc<dyn Fn(Arc<C>, Value) -> ActionFuture + Send + Sync>;

struct ActionEntry<C> {
    metadata: ActionMetadata,
    handler: Handler<C>,
}

/// Arguments of actions that take none.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TalkToUserArgs {
    /// Message shown to the user
    pub content: String,
}

fn render_talk(args: &Value) -> RenderedBody {
    RenderedBody {
        text: args
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_string),
        code: None,
    }
}

/// Explicit registration table of one controller type.
///
/// Entries keep registration order; registering an existing name replaces
/// the earlier entry in place.
pub struct ActionTable<C> {
    entries: Vec<ActionEntry<C>>,
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> ActionTable<C>
where
    C: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the actions every controller offers.
    pub fn with_base_actions() -> Self {
        let mut table = Self::new();
        table.register(
            ActionMetadata::new(MARK_TASK_DONE, "Signal that the current task is complete.")
                .labels("Finishing task", "Task done"),
            |_controller: Arc<C>, _args: NoArgs| async { Ok(ActionContent::blank()) },
        );
        table.register(
            ActionMetadata::new(TALK_TO_USER, "Send a message to the user.")
                .labels("Writing to user", "Wrote to user")
                .render_with(render_talk),
            |_controller: Arc<C>, args: TalkToUserArgs| async move {
                Ok(ActionContent::text(args.content))
            },
        );
        table
    }

    /// Register `handler` under `metadata.name` with typed arguments `A`.
    ///
    /// The argument schema is derived from `A`. A request whose arguments do
    /// not deserialize into `A` fails like any other action body.
    pub fn register<A, F, Fut>(&mut self, metadata: ActionMetadata, handler: F) -> &mut Self
    where
        A: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(Arc<C>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ActionContent>> + Send + 'static,
    {
        let metadata = metadata.with_schema::<A>();
        let name = metadata.name.clone();
        let handler: Handler<C> = Arc::new(move |controller, args| {
            // Actions without arguments may be sent `null`.
            let args = if args.is_null() {
                Value::Object(Default::default())
            } else {
                args
            };
            match serde_json::from_value::<A>(args)
                .with_context(|| format!("invalid arguments for '{}'", name))
            {
                Ok(args) => handler(controller, args).boxed(),
                Err(err) => future::ready(Err(err)).boxed(),
            }
        });

        let entry = ActionEntry { metadata, handler };
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.metadata.name == entry.metadata.name)
        {
            Some(existing) => {
                warn!(action = %entry.metadata.name, "replacing registered action");
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn metadata(&self, name: &str) -> Option<&ActionMetadata> {
        self.entry(name).map(|entry| &entry.metadata)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.metadata.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn descriptors(&self) -> Vec<ActionDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.metadata.descriptor())
            .collect()
    }

    /// Start the named action; `None` when the name is not registered.
    pub fn invoke(&self, controller: Arc<C>, name: &str, args: Value) -> Option<ActionFuture> {
        self.entry(name)
            .map(|entry| (entry.handler)(controller, args))
    }

    fn entry(&self, name: &str) -> Option<&ActionEntry<C>> {
        self.entries
            .iter()
            .find(|entry| entry.metadata.name == name)
    }
}

/// What the dispatcher needs from the active controller.
pub trait ActionTarget: Send + Sync {
    fn app_id(&self) -> &str;

    fn catalogue(&self) -> Vec<ActionDescriptor>;

    fn metadata(&self, action: &str) -> Option<ActionMetadata>;

    fn invoke(&self, action: &str, args: Value) -> Option<ActionFuture>;
}

/// A controller instance paired with its action table.
pub struct BoundController<C> {
    app_id: String,
    controller: Arc<C>,
    table: Arc<ActionTable<C>>,
}

impl<C> BoundController<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(app_id: impl Into<String>, controller: Arc<C>, table: ActionTable<C>) -> Self {
        Self {
            app_id: app_id.into(),
            controller,
            table: Arc::new(table),
        }
    }

    pub fn controller(&self) -> &Arc<C> {
        &self.controller
    }

    pub fn table(&self) -> &ActionTable<C> {
        &self.table
    }
}

impl<C> ActionTarget for BoundController<C>
where
    C: Send + Sync + 'static,
{
    fn app_id(&self) -> &str {
        &self.app_id
    }

    fn catalogue(&self) -> Vec<ActionDescriptor> {
        self.table.descriptors()
    }

    fn metadata(&self, action: &str) -> Option<ActionMetadata> {
        self.table.metadata(action).cloned()
    }

    fn invoke(&self, action: &str, args: Value) -> Option<ActionFuture> {
        self.table.invoke(self.controller.clone(), action, args)
    }
}
