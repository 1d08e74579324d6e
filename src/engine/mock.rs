//! Mock query engine for testing.
//!
//! Returns a predefined outcome and records every call, so tests can
//! assert that the boundary was (or was not) invoked.

use super::{QueryEngine, QueryOutcome, QueryRequest};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A mock query engine with a canned outcome.
#[derive(Default)]
pub struct MockQueryEngine {
    outcome: QueryOutcome,
    calls: AtomicUsize,
    last_request: Mutex<Option<QueryRequest>>,
}

impl MockQueryEngine {
    /// Creates a mock that reports success.
    pub fn succeeding() -> Self {
        Self::with_outcome(QueryOutcome {
            success: true,
            ..Default::default()
        })
    }

    /// Creates a mock that reports failure with the given error message.
    pub fn failing(error: impl Into<String>) -> Self {
        Self::with_outcome(QueryOutcome {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        })
    }

    /// Creates a mock returning the given outcome.
    pub fn with_outcome(outcome: QueryOutcome) -> Self {
        Self {
            outcome,
            ..Default::default()
        }
    }

    /// Returns how many times the engine was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the most recent request, if any call was made.
    pub fn last_request(&self) -> Option<QueryRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl QueryEngine for MockQueryEngine {
    async fn execute(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        Ok(self.outcome.clone())
    }
}
