//! Publishers: persist rendered artefacts somewhere addressable.
//!
//! Every publish is an upsert. Transient failures are retried with
//! exponential backoff; permanent ones surface immediately.

mod directory;
mod github;

pub use directory::DirectoryPublisher;
pub use github::GithubPublisher;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::constants::publish::{BASE_DELAY_MS, MAX_ATTEMPTS, MAX_DELAY_SECS};
use crate::types::{DocError, Result};

/// One file to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Path relative to the publisher root
    pub path: String,
    pub content: String,
    /// Commit message, where the target records one
    pub message: String,
    /// Target branch; `None` uses the publisher's default
    pub branch: Option<String>,
}

impl PublishRequest {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            message: format!("Update {}", path),
            path,
            content: content.into(),
            branch: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Create or update one file; returns an addressable location
    async fn publish(&self, request: &PublishRequest) -> Result<String>;

    fn name(&self) -> &str;
}

/// Backoff settings for transient publish failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
            max_delay: Duration::from_secs(MAX_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
            .with_jitter()
    }

    /// Run `op`, retrying while it fails with a transient error
    pub async fn run<T, F, Fut>(&self, label: &str, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        op.retry(self.backoff())
            .when(DocError::is_transient)
            .notify(|err: &DocError, delay: Duration| {
                warn!(
                    delay_ms = delay.as_millis() as u64,
                    "Transient failure publishing {}: {}", label, err
                );
            })
            .await
    }
}
