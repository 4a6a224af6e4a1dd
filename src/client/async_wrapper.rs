//! Async wrapper around the synchronous ImageHostClient.
//!
//! This module provides an async interface to the synchronous client by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime. Transient failures are retried
//! with exponential backoff.

use crate::client::{ImageHostClient, UploadedImage};
use crate::error::{ImageHostError, ImageHostResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Image host operations used by the services.
#[async_trait]
pub trait AsyncImageHost: Send + Sync {
    /// Upload a file as a new asset.
    async fn upload(&self, path: &Path) -> ImageHostResult<UploadedImage>;

    /// Upload a file over the asset `public_id`.
    async fn upload_overwrite(&self, public_id: &str, path: &Path)
        -> ImageHostResult<UploadedImage>;

    /// Delete the asset `public_id`.
    async fn destroy(&self, public_id: &str) -> ImageHostResult<()>;
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// No retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Async wrapper around the synchronous ImageHostClient.
#[derive(Clone)]
pub struct AsyncImageHostImpl {
    client: Arc<ImageHostClient>,
    retry: RetryPolicy,
}

impl AsyncImageHostImpl {
    pub fn new(client: ImageHostClient, retry: RetryPolicy) -> Self {
        Self {
            client: Arc::new(client),
            retry,
        }
    }

    /// Run a blocking client call, retrying transient failures.
    async fn run<T, F>(&self, operation: &str, call: F) -> ImageHostResult<T>
    where
        T: Send + 'static,
        F: Fn(&ImageHostClient) -> ImageHostResult<T> + Send + Sync + 'static,
    {
        let call = Arc::new(call);
        let mut attempt = 0;

        loop {
            let client = self.client.clone();
            let call = call.clone();

            let result = tokio::task::spawn_blocking(move || call(client.as_ref()))
                .await
                .map_err(|e| ImageHostError::HttpError(format!("Task join error: {}", e)))?;

            match result {
                Err(err) if err.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.backoff(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "Image host {} failed ({}), retry {}/{} in {:?}",
                        operation,
                        err,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl AsyncImageHost for AsyncImageHostImpl {
    async fn upload(&self, path: &Path) -> ImageHostResult<UploadedImage> {
        let path: PathBuf = path.to_path_buf();
        self.run("upload", move |client| client.upload(&path)).await
    }

    async fn upload_overwrite(
        &self,
        public_id: &str,
        path: &Path,
    ) -> ImageHostResult<UploadedImage> {
        let public_id = public_id.to_string();
        let path: PathBuf = path.to_path_buf();
        self.run("overwrite", move |client| {
            client.upload_overwrite(&public_id, &path)
        })
        .await
    }

    async fn destroy(&self, public_id: &str) -> ImageHostResult<()> {
        let public_id = public_id.to_string();
        self.run("destroy", move |client| client.destroy(&public_id))
            .await
    }
}
