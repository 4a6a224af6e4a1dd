//! Test doubles and fixtures shared by the integration tests.

#![allow(dead_code)]

mod flaky_contact_store;
mod mock_image_host;

pub use flaky_contact_store::FlakyContactStore;
pub use mock_image_host::MockImageHost;

use contacts_backend::metrics::Metrics;
use contacts_backend::models::ContactPayload;
use contacts_backend::repositories::{ContactRepository, ImageRepository, InMemoryStore};
use contacts_backend::services::ContactServiceImpl;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// A contact service wired to an in-memory store and a mock image host.
pub struct Harness {
    pub store: InMemoryStore,
    pub host: MockImageHost,
    pub metrics: Metrics,
    pub service: ContactServiceImpl,
}

impl Harness {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let contacts = Arc::new(store.clone()) as Arc<dyn ContactRepository>;
        Self::with_contacts(store, contacts)
    }

    /// Use `contacts` for contact writes; images still go to `store`.
    pub fn with_contacts(store: InMemoryStore, contacts: Arc<dyn ContactRepository>) -> Self {
        let host = MockImageHost::new();
        let metrics = Metrics::new();
        let service = ContactServiceImpl::new(
            contacts,
            Arc::new(store.clone()) as Arc<dyn ImageRepository>,
            Arc::new(host.clone()),
            metrics.clone(),
        );
        Self {
            store,
            host,
            metrics,
            service,
        }
    }
}

/// A small image on disk.
pub fn image_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(b"\xFF\xD8\xFFfake-jpeg").unwrap();
    file
}

/// Payload with the given names and phone numbers.
pub fn payload(first: &str, last: Option<&str>, phone_numbers: Value) -> ContactPayload {
    ContactPayload {
        first_name: Some(first.to_string()),
        last_name: last.map(str::to_string),
        phone_numbers: Some(phone_numbers),
        ..Default::default()
    }
}
