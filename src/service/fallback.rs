//! Ordered fallback chains
//!
//! A [`FallbackChain`] is a list of labelled attempts at one logical
//! operation. Steps run strictly in order and the first one producing
//! non-empty records wins. When every step fails or comes back empty the last
//! error is returned.

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Error;

/// One attempt within a chain
pub struct FallbackStep<'a> {
    pub label: &'static str,
    attempt: BoxFuture<'a, Result<Vec<Value>, Error>>,
}

/// Winning step of a chain
#[derive(Debug)]
pub struct FallbackOutcome {
    pub label: &'static str,
    pub records: Vec<Value>,
}

pub struct FallbackChain<'a> {
    operation: &'static str,
    steps: Vec<FallbackStep<'a>>,
}

impl<'a> FallbackChain<'a> {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            steps: Vec::new(),
        }
    }

    /// Append a step. The future is not polled until the chain reaches it.
    pub fn step(mut self, label: &'static str, attempt: BoxFuture<'a, Result<Vec<Value>, Error>>) -> Self {
        self.steps.push(FallbackStep { label, attempt });
        self
    }

    /// Step labels in execution order
    pub fn labels(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.label).collect()
    }

    pub async fn run(self) -> Result<FallbackOutcome, Error> {
        let mut last_error = None;

        for step in self.steps {
            match step.attempt.await {
                Ok(records) if !records.is_empty() => {
                    debug!("{}: '{}' returned {} records", self.operation, step.label, records.len());
                    return Ok(FallbackOutcome {
                        label: step.label,
                        records,
                    });
                }
                Ok(_) => {
                    debug!("{}: '{}' returned nothing", self.operation, step.label);
                    last_error = Some(Error::EmptyResult(format!("{} ({})", self.operation, step.label)));
                }
                Err(error) => {
                    warn!("{}: '{}' failed: {}", self.operation, step.label, error);
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::EmptyResult(self.operation.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn upstream(status: u16) -> Error {
        Error::Upstream {
            status,
            status_text: String::new(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_non_empty_step() {
        let polled = Arc::new(AtomicUsize::new(0));
        let third = polled.clone();

        let outcome = FallbackChain::new("hotel search")
            .step("by-city", Box::pin(async { Err::<Vec<Value>, _>(upstream(500)) }))
            .step("city-offers", Box::pin(async { Ok::<_, Error>(vec![json!({ "id": 1 })]) }))
            .step(
                "keyword",
                Box::pin(async move {
                    third.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Error>(vec![json!({ "id": 2 })])
                }),
            )
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.label, "city-offers");
        assert_eq!(outcome.records, vec![json!({ "id": 1 })]);
        assert_eq!(polled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error() {
        let chain = FallbackChain::new("hotel search")
            .step("a", Box::pin(async { Ok::<_, Error>(Vec::<Value>::new()) }))
            .step("b", Box::pin(async { Err::<Vec<Value>, _>(upstream(400)) }))
            .step("c", Box::pin(async { Err::<Vec<Value>, _>(upstream(503)) }));
        assert_eq!(chain.labels(), vec!["a", "b", "c"]);

        let err = chain.run().await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_trailing_empty_step_reports_empty_result() {
        let err = FallbackChain::new("hotel search")
            .step("a", Box::pin(async { Err::<Vec<Value>, _>(upstream(500)) }))
            .step("b", Box::pin(async { Ok::<_, Error>(Vec::<Value>::new()) }))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyResult(ref what) if what == "hotel search (b)"));
    }
}
