use crate::domain::ContactId;
use crate::error::StoreResult;
use crate::models::{Contact, ContactWithImage, Image};
use crate::repositories::query::{Filter, Pipeline};
use async_trait::async_trait;

/// Repository for managing contacts.
///
/// Provides abstraction over the document store, enabling different
/// implementations (in-memory, mock, external database).
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Retrieve a single contact by ID.
    async fn get(&self, id: &ContactId) -> StoreResult<Contact>;

    /// First contact matching the filter, in store order.
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Contact>>;

    /// Run a read pipeline; results are in store order.
    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<Vec<ContactWithImage>>;

    /// Insert a new contact.
    ///
    /// Fails with `StoreError::DuplicateKey` if a phone number or email is
    /// already held by another contact.
    async fn create(&self, contact: &Contact) -> StoreResult<Contact>;

    /// Replace an existing contact, with the same uniqueness rules as `create`.
    async fn update(&self, contact: &Contact) -> StoreResult<Contact>;

    /// Delete a contact.
    async fn delete(&self, id: &ContactId) -> StoreResult<()>;
}

/// Repository for image metadata.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Image>;

    async fn create(&self, image: &Image) -> StoreResult<Image>;

    /// Replace an existing image record in place.
    async fn update(&self, image: &Image) -> StoreResult<Image>;

    async fn delete(&self, id: &str) -> StoreResult<()>;
}
