use std::sync::Arc;

use dom_query::{DomPort, ElementHandle, QuerySelector, QuerySelectorMap, Resolver};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::InteractionError;
use crate::types::{InteractionTimings, Target};

/// Element currently carrying the highlight style, with the inline values
/// it had before.
#[derive(Debug, Clone)]
pub(crate) struct HighlightState {
    pub(crate) element: ElementHandle,
    pub(crate) previous: Vec<(String, String)>,
}

/// Owner of everything primitives share across invocations.
///
/// One session drives one page. The highlight slot is the only mutable
/// state; at most one element is highlighted at a time.
pub struct InteractionSession {
    resolver: Resolver,
    selectors: QuerySelectorMap,
    timings: InteractionTimings,
    pub(crate) highlighted: Mutex<Option<HighlightState>>,
}

impl InteractionSession {
    pub fn new(port: Arc<dyn DomPort>, selectors: QuerySelectorMap) -> Self {
        Self {
            resolver: Resolver::new(port),
            selectors,
            timings: InteractionTimings::default(),
            highlighted: Mutex::new(None),
        }
    }

    pub fn with_timings(mut self, timings: InteractionTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn port(&self) -> &Arc<dyn DomPort> {
        self.resolver.port()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn selectors(&self) -> &QuerySelectorMap {
        &self.selectors
    }

    pub fn timings(&self) -> &InteractionTimings {
        &self.timings
    }

    /// Resolve a target to its selector; unknown names are configuration drift.
    pub fn selector_for(&self, target: Target<'_>) -> Result<QuerySelector, InteractionError> {
        match target {
            Target::Selector(selector) => Ok(selector.clone()),
            Target::Named(name) => self.selectors.get(name).cloned().ok_or_else(|| {
                InteractionError::UnknownSelector {
                    name: name.to_string(),
                }
            }),
        }
    }

    /// The `index`-th live match of `selector`, re-resolved on every call.
    pub(crate) async fn element_at(
        &self,
        selector: &QuerySelector,
        index: usize,
    ) -> Option<ElementHandle> {
        let element = self.resolver.resolve_nth(selector, index).await;
        if element.is_none() {
            debug!(selector = %selector, index, "target not found; skipping");
        }
        element
    }

    /// Let the host UI react to the previous simulated event.
    pub(crate) async fn settle(&self) {
        if self.timings.settle_delay_ms > 0 {
            tokio::time::sleep(self.timings.settle_delay()).await;
        }
    }

    pub async fn highlighted_element(&self) -> Option<ElementHandle> {
        self.highlighted
            .lock()
            .await
            .as_ref()
            .map(|state| state.element.clone())
    }
}
