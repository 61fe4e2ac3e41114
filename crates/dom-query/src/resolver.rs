use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::errors::DomError;
use crate::port::DomPort;
use crate::types::{DomQuery, DomRecord, ElementHandle, QuerySelector, RecordValue};

/// Attribute name that reads text content instead of a DOM attribute.
pub const TEXT_ATTRIBUTE: &str = "text";

/// Selector resolution engine.
///
/// Misses and port failures both resolve to an empty result: the host UI
/// renders asynchronously, so callers poll rather than handle errors.
/// [`Resolver::try_resolve`] keeps transport failures apart for callers
/// that read absence as a signal.
#[derive(Clone)]
pub struct Resolver {
    port: Arc<dyn DomPort>,
}

impl Resolver {
    pub fn new(port: Arc<dyn DomPort>) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &Arc<dyn DomPort> {
        &self.port
    }

    pub async fn resolve(&self, selector: &QuerySelector) -> Vec<ElementHandle> {
        self.resolve_in(selector, None).await
    }

    /// Like [`Resolver::resolve`], but a browser transport failure is an
    /// error instead of a miss. Other port errors still count as no match.
    pub async fn try_resolve(
        &self,
        selector: &QuerySelector,
    ) -> Result<Vec<ElementHandle>, DomError> {
        match self.port.query_all(selector, None).await {
            Ok(handles) => Ok(handles),
            Err(err @ DomError::Runtime(_)) => Err(err),
            Err(err) => {
                debug!(selector = %selector, error = %err, "selector resolution failed; treating as miss");
                Ok(Vec::new())
            }
        }
    }

    pub async fn resolve_in(
        &self,
        selector: &QuerySelector,
        scope: Option<&ElementHandle>,
    ) -> Vec<ElementHandle> {
        match self.port.query_all(selector, scope).await {
            Ok(handles) => handles,
            Err(err) => {
                debug!(selector = %selector, error = %err, "selector resolution failed; treating as miss");
                Vec::new()
            }
        }
    }

    /// The `index`-th match, if that many exist.
    pub async fn resolve_nth(
        &self,
        selector: &QuerySelector,
        index: usize,
    ) -> Option<ElementHandle> {
        self.resolve(selector).await.into_iter().nth(index)
    }

    pub async fn exists(&self, selector: &QuerySelector) -> bool {
        !self.resolve(selector).await.is_empty()
    }

    /// One record per root match, in document order.
    pub async fn resolve_query(&self, query: &DomQuery) -> Vec<DomRecord> {
        self.resolve_query_in(query, None).await
    }

    /// Children are evaluated with their parent match as the search context.
    fn resolve_query_in<'a>(
        &'a self,
        query: &'a DomQuery,
        scope: Option<&'a ElementHandle>,
    ) -> BoxFuture<'a, Vec<DomRecord>> {
        Box::pin(async move {
            let matches = self.resolve_in(&query.selector, scope).await;
            let mut records = Vec::with_capacity(matches.len());

            for element in &matches {
                let mut record = DomRecord::new();
                for name in &query.attributes_to_extract {
                    let value = self.read_attribute(element, name).await;
                    record.insert(name.clone(), RecordValue::Attribute(value));
                }
                for (name, child) in &query.children {
                    let nested = self.resolve_query_in(child, Some(element)).await;
                    record.insert(name.clone(), RecordValue::Children(nested));
                }
                records.push(record);
            }

            records
        })
    }

    async fn read_attribute(&self, element: &ElementHandle, name: &str) -> Option<String> {
        let result = if name == TEXT_ATTRIBUTE {
            self.port
                .text_content(element)
                .await
                .map(|text| Some(text.trim().to_string()))
        } else {
            self.port.attribute(element, name).await
        };

        match result {
            Ok(value) => value,
            Err(err) => {
                debug!(element = %element, attribute = name, error = %err, "attribute read failed");
                None
            }
        }
    }
}
