//! Action registry and dispatcher
//!
//! Controllers declare their actions in an explicit [`ActionTable`]: a
//! mapping from action name to metadata plus a typed handler, built once at
//! construction. The [`Dispatcher`] looks a requested name up in the active
//! controller's table and runs it, turning every outcome into data:
//! - unknown names and a missing controller are [`DispatchError`]s
//! - handler failures (errors, panics, invalid arguments) become `Failed`
//!   [`ActionRecord`]s carrying an error [`ActionContent`]
//!
//! [`SerialDispatcher`] runs one invocation at a time and keeps only the
//! latest waiting request.

pub mod content;
mod dispatcher;
pub mod errors;
pub mod events;
mod metadata;
mod serial;
mod table;

pub use content::ActionContent;
pub use dispatcher::{ActionRecord, ActionRequest, Dispatcher};
pub use errors::DispatchError;
pub use events::{InvocationEvent, InvocationStatus};
pub use metadata::{ActionDescriptor, ActionMetadata, RenderFn, RenderedBody};
pub use serial::SerialDispatcher;
pub use table::{
    ActionFuture, ActionTable, ActionTarget, BoundController, NoArgs, TalkToUserArgs,
    MARK_TASK_DONE, TALK_TO_USER,
};
