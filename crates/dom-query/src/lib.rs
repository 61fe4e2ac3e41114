//! Declarative selector resolution.
//!
//! This crate turns serializable descriptions of "where things are" into live
//! element handles and structured records:
//! - [`QuerySelector`] locates zero or more elements (XPath, CSS or text)
//! - [`DomQuery`] extracts attributes and recurses into named child queries
//! - [`QuerySelectorMap`] names selectors per application
//! - [`DomPort`] is the element-level capability set every layer drives
//! - [`Resolver`] is the engine; a miss is an empty result, never an error
//!
//! [`ScriptDomPort`] backs the port with a browser tab. With the `fixtures`
//! feature, `memory::FixtureDom` backs it with an in-memory tree for tests.

pub mod errors;
pub mod keys;
#[cfg(feature = "fixtures")]
pub mod memory;
mod port;
mod resolver;
mod script;
mod selector_map;
pub mod types;

pub use errors::{DomError, DomQueryError};
pub use keys::{parse_key_sequence, KeyInput, SpecialKey};
pub use port::DomPort;
pub use resolver::{Resolver, TEXT_ATTRIBUTE};
pub use script::ScriptDomPort;
pub use selector_map::QuerySelectorMap;
pub use types::*;
