//! Deterministic [`SignalSource`] test double.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::port::SignalSource;

/// One scripted fetch result.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Body(String),
    Status(u16),
    Timeout,
    /// Never completes; for exercising shutdown mid-fetch.
    Stall,
}

/// A source that replays a fixed script of fetch results.
///
/// Once the script is exhausted every fetch fails with status 503.
#[derive(Debug)]
pub struct ScriptedSource {
    steps: VecDeque<ScriptStep>,
    fetches: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn with_steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of fetch calls, usable after the source is moved.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalSource for ScriptedSource {
    async fn fetch(&mut self) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.steps.pop_front() {
            Some(ScriptStep::Body(body)) => Ok(body),
            Some(ScriptStep::Status(code)) => Err(FetchError::Status { code }),
            Some(ScriptStep::Timeout) => Err(FetchError::Timeout { timeout_secs: 10.0 }),
            Some(ScriptStep::Stall) => std::future::pending().await,
            None => Err(FetchError::Status { code: 503 }),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
