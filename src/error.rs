//! Error types for the contacts backend.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! [`ContactError`] is the taxonomy surfaced to API clients; the other enums
//! describe failures of individual collaborators and convert into it.

use crate::domain::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for any 500-class failure. Internal details are logged, not returned.
pub const INTERNAL_ERROR_MSG: &str = "Something went wrong, try again later";

/// Errors surfaced by contact operations.
#[derive(Error, Debug)]
pub enum ContactError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Duplicate phone number or email
    #[error("{0}")]
    Conflict(String),

    /// Unknown contact id
    #[error("{0}")]
    NotFound(String),

    /// The request body could not be read (too large, wrong encoding)
    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    /// The image host failed
    #[error("Image host error: {0}")]
    Upstream(#[from] ImageHostError),

    /// Anything else
    #[error("Unhandled error: {0}")]
    Unhandled(String),
}

impl ContactError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) | ContactError::Conflict(_) => StatusCode::BAD_REQUEST,
            ContactError::NotFound(_) => StatusCode::NOT_FOUND,
            ContactError::BodyRejected { status, .. } => *status,
            ContactError::Upstream(_) | ContactError::Unhandled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to the client.
    pub fn client_message(&self) -> String {
        match self {
            ContactError::Upstream(_) | ContactError::Unhandled(_) => INTERNAL_ERROR_MSG.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ContactError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ContactError::NotFound(what),
            StoreError::DuplicateKey { field, .. } => ContactError::Conflict(duplicate_message(field)),
            StoreError::Other(message) => ContactError::Unhandled(message),
        }
    }
}

/// Client-facing message for a uniqueness violation on `field`.
pub fn duplicate_message(field: &str) -> String {
    match field {
        "email" => "Email already exists".to_string(),
        _ => "Mobile Number already exists, please provide unique number".to_string(),
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(json!({ "msg": self.client_message() }))).into_response()
    }
}

/// Errors that can occur when talking to the image host.
#[derive(Error, Debug)]
pub enum ImageHostError {
    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Host returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reading the local upload failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Credentials rejected
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Generic error with context
    #[error("Image host error: {0}")]
    Other(String),
}

impl ImageHostError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ImageHostError::HttpError(_)
            | ImageHostError::Timeout
            | ImageHostError::RateLimitExceeded => true,
            ImageHostError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Errors returned by the document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No document with the given identity
    #[error("{0}")]
    NotFound(String),

    /// A unique index rejected the write
    #[error("Duplicate value for {field}: {value}")]
    DuplicateKey { field: &'static str, value: String },

    /// Generic store error
    #[error("Store error: {0}")]
    Other(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with ContactError
pub type ContactResult<T> = Result<T, ContactError>;

/// Convenience type alias for Results with ImageHostError
pub type ImageHostResult<T> = Result<T, ImageHostError>;

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
