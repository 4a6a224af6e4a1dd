//! HTTP client for the external image host.
//!
//! The host speaks the Cloudinary upload API: signed JSON requests carrying
//! the image as a base64 data URI. This module provides a synchronous client
//! that is called from async contexts via `tokio::task::spawn_blocking`
//! (see [`AsyncImageHostImpl`]).

mod async_wrapper;
pub use async_wrapper::{AsyncImageHost, AsyncImageHostImpl, RetryPolicy};

use crate::config::Config;
use crate::error::{ImageHostError, ImageHostResult};
use crate::metrics::{HttpTimer, Metrics};
use base64::{prelude::BASE64_STANDARD, Engine};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedImage {
    /// Identifier on the host; pass it back to overwrite the asset
    pub public_id: String,

    /// HTTPS URL of the stored asset
    pub secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// HTTP client for the image host.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct ImageHostClient {
    /// API root, e.g. `https://api.cloudinary.com/v1_1`
    base_url: String,

    cloud_name: String,
    api_key: String,
    api_secret: String,

    agent: Arc<ureq::Agent>,
    metrics: Metrics,
}

impl ImageHostClient {
    /// Create a client from configuration.
    pub fn new(config: &Config, metrics: Metrics) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.image_host_timeout))
            .build();

        Self {
            base_url: config.image_host_url.clone(),
            cloud_name: config.image_host_cloud_name.clone(),
            api_key: config.image_host_api_key.clone(),
            api_secret: config.image_host_api_secret.clone(),
            agent: Arc::new(agent),
            metrics,
        }
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(
        base_url: String,
        cloud_name: String,
        api_key: String,
        api_secret: String,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            cloud_name,
            api_key,
            api_secret,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build the URL for an image action (`upload`, `destroy`).
    fn build_url(&self, action: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/{}/image/{}", base, self.cloud_name, action)
    }

    /// Add timestamp, API key and signature to a set of signed parameters.
    fn signed_body(&self, mut params: BTreeMap<&'static str, String>) -> Map<String, Value> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &self.api_secret);

        let mut body: Map<String, Value> = params
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        body.insert("api_key".to_string(), Value::String(self.api_key.clone()));
        body.insert("signature".to_string(), Value::String(signature));
        body
    }

    /// Execute a POST request with a JSON body.
    fn post(&self, action: &str, body: &Map<String, Value>) -> ImageHostResult<ureq::Response> {
        let url = self.build_url(action);
        let timer = HttpTimer::new(self.metrics.clone());

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e));

        match &result {
            Ok(response) => {
                tracing::debug!("POST {} - Success (status: {})", url, response.status());
                timer.complete();
            }
            Err(e) => {
                tracing::warn!("POST {} - Error: {}", url, e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Map a ureq error to an ImageHostError.
    fn map_error(&self, error: ureq::Error) -> ImageHostError {
        match error {
            ureq::Error::Status(code, response) => {
                let raw = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let message = serde_json::from_str::<ErrorBody>(&raw)
                    .map(|body| body.error.message)
                    .unwrap_or(raw);

                match code {
                    401 => ImageHostError::Unauthorized,
                    420 | 429 => ImageHostError::RateLimitExceeded,
                    _ => ImageHostError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    ImageHostError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    ImageHostError::Timeout
                } else {
                    ImageHostError::HttpError(transport.to_string())
                }
            }
        }
    }

    fn read_upload(response: ureq::Response) -> ImageHostResult<UploadedImage> {
        let body = response
            .into_string()
            .map_err(|e| ImageHostError::HttpError(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Upload a local file as a new asset.
    pub fn upload(&self, path: &Path) -> ImageHostResult<UploadedImage> {
        let mut body = self.signed_body(BTreeMap::new());
        body.insert("file".to_string(), Value::String(data_uri(path)?));

        let response = self.post("upload", &body)?;
        let uploaded = Self::read_upload(response)?;
        tracing::info!("Uploaded image {}", uploaded.public_id);
        Ok(uploaded)
    }

    /// Upload a local file over an existing asset, invalidating cached copies.
    pub fn upload_overwrite(&self, public_id: &str, path: &Path) -> ImageHostResult<UploadedImage> {
        let params = BTreeMap::from([
            ("public_id", public_id.to_string()),
            ("overwrite", "true".to_string()),
            ("invalidate", "true".to_string()),
        ]);
        let mut body = self.signed_body(params);
        body.insert("file".to_string(), Value::String(data_uri(path)?));

        let response = self.post("upload", &body)?;
        let uploaded = Self::read_upload(response)?;
        tracing::info!("Replaced image {}", uploaded.public_id);
        Ok(uploaded)
    }

    /// Delete an asset. Deleting an unknown asset is not an error.
    pub fn destroy(&self, public_id: &str) -> ImageHostResult<()> {
        let params = BTreeMap::from([
            ("public_id", public_id.to_string()),
            ("invalidate", "true".to_string()),
        ]);
        let body = self.signed_body(params);

        let response = self.post("destroy", &body)?;
        let text = response
            .into_string()
            .map_err(|e| ImageHostError::HttpError(e.to_string()))?;
        let parsed: DestroyResponse = serde_json::from_str(&text)?;

        match parsed.result.as_str() {
            "ok" | "not found" => {
                tracing::info!("Destroyed image {} ({})", public_id, parsed.result);
                Ok(())
            }
            other => Err(ImageHostError::Other(format!(
                "Unexpected destroy result for {}: {}",
                public_id, other
            ))),
        }
    }
}

/// Sign request parameters: SHA-1 over `k=v` pairs sorted by key and joined
/// with `&`, followed by the API secret.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha1::digest(format!("{}{}", to_sign, api_secret).as_bytes());
    hex::encode(digest)
}

/// Read a file into a base64 data URI, guessing the media type from the extension.
fn data_uri(path: &Path) -> ImageHostResult<String> {
    let bytes = std::fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    Ok(format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sign_params() {
        let params = BTreeMap::from([
            ("timestamp", "1700000000".to_string()),
            ("public_id", "contacts/anna".to_string()),
        ]);
        assert_eq!(
            sign_params(&params, "secret-456"),
            "f1156e7138d56a82f675dce0c5daf9b7a931b9db"
        );
    }

    #[test]
    fn test_sign_params_sorted_by_key() {
        let params = BTreeMap::from([
            ("timestamp", "1700000000".to_string()),
            ("public_id", "abc".to_string()),
            ("overwrite", "true".to_string()),
            ("invalidate", "true".to_string()),
        ]);
        assert_eq!(
            sign_params(&params, "s3cr3t"),
            "5247230565e15d7c8f5eb63bcb9248f1e51ba386"
        );
    }

    #[test]
    fn test_data_uri() {
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"fake-jpeg-bytes").unwrap();

        let uri = data_uri(file.path()).unwrap();
        assert_eq!(uri, "data:image/jpeg;base64,ZmFrZS1qcGVnLWJ5dGVz");
    }

    #[test]
    fn test_data_uri_missing_file() {
        let result = data_uri(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(ImageHostError::Io(_))));
    }

    #[test]
    fn test_build_url() {
        let client = ImageHostClient::with_base_url(
            "http://localhost:1234/v1_1/".to_string(),
            "demo".to_string(),
            "key".to_string(),
            "secret".to_string(),
        );
        assert_eq!(
            client.build_url("upload"),
            "http://localhost:1234/v1_1/demo/image/upload"
        );
    }
}
