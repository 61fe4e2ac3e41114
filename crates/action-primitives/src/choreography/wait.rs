use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use dom_query::QuerySelector;

use crate::{errors::InteractionError, session::InteractionSession, types::Target};

impl InteractionSession {
    /// Poll until the running indicator stops matching.
    ///
    /// Returns the number of polls made; the last one is the first that
    /// found no indicator. There is no upper bound: the host application
    /// offers no completion event, so the indicator is the only signal.
    /// Use [`InteractionSession::wait_for_query_execution_within`] for a
    /// bounded wait.
    pub async fn wait_for_query_execution(
        &self,
        indicator: Target<'_>,
    ) -> Result<u32, InteractionError> {
        let selector = self.selector_for(indicator)?;
        let interval = self.timings().query_poll_interval();
        info!(indicator = %selector, "Waiting for query execution");

        let mut polls = 0u32;
        loop {
            polls += 1;
            if !self.indicator_present(&selector).await? {
                info!(indicator = %selector, polls, "Query execution finished");
                return Ok(polls);
            }
            debug!(indicator = %selector, polls, "query still running");
            sleep(interval).await;
        }
    }

    /// Like [`InteractionSession::wait_for_query_execution`], but gives up
    /// with [`InteractionError::DeadlineExceeded`] once `deadline` has passed
    /// and the indicator is still present.
    pub async fn wait_for_query_execution_within(
        &self,
        indicator: Target<'_>,
        deadline: Duration,
    ) -> Result<u32, InteractionError> {
        let selector = self.selector_for(indicator)?;
        let interval = self.timings().query_poll_interval();
        info!(
            indicator = %selector,
            deadline_ms = deadline.as_millis() as u64,
            "Waiting for query execution"
        );

        let started = Instant::now();
        let mut polls = 0u32;
        loop {
            polls += 1;
            if !self.indicator_present(&selector).await? {
                info!(indicator = %selector, polls, "Query execution finished");
                return Ok(polls);
            }

            let elapsed = started.elapsed();
            if elapsed >= deadline {
                warn!(indicator = %selector, polls, "query still running at deadline");
                return Err(InteractionError::DeadlineExceeded {
                    selector: selector.to_string(),
                    waited_ms: elapsed.as_millis() as u64,
                });
            }
            sleep(interval.min(deadline - elapsed)).await;
        }
    }

    /// A lost page is not a finished query.
    async fn indicator_present(&self, selector: &QuerySelector) -> Result<bool, InteractionError> {
        match self.resolver().try_resolve(selector).await {
            Ok(handles) => Ok(!handles.is_empty()),
            Err(err) => {
                warn!(indicator = %selector, error = %err, "page unreachable while waiting");
                Err(InteractionError::Port {
                    selector: selector.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }
}
