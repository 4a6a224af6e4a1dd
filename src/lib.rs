//! Contacts Backend - an HTTP service for managing contacts with profile images.
//!
//! Clients create, list, update, delete and search contact records. Each
//! contact owns one image kept on an external, Cloudinary-compatible host.
//!
//! # Architecture
//!
//! - **domain**: Validated value objects (ids, emails, phone numbers, birth dates)
//! - **models**: Stored records and request payloads
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the image host
//! - **repositories**: Store traits, the query pipeline and the in-memory store
//! - **services**: Validation, uniqueness, image association, CRUD and search
//! - **server**: axum router and handlers
//! - **metrics**: Counters for image host calls and contact operations

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use client::{AsyncImageHost, AsyncImageHostImpl, ImageHostClient, RetryPolicy};
pub use config::Config;
pub use error::{ConfigError, ContactError, ImageHostError, StoreError};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Contact, ContactPayload, ContactWithImage, Image};
pub use repositories::InMemoryStore;
pub use server::{create_router, AppState};
pub use services::{ContactService, ContactServiceImpl, SearchQuery, SearchService, SearchServiceImpl};
