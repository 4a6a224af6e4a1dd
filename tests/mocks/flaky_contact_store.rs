use async_trait::async_trait;
use contacts_backend::domain::ContactId;
use contacts_backend::error::{StoreError, StoreResult};
use contacts_backend::models::{Contact, ContactWithImage};
use contacts_backend::repositories::{ContactRepository, Filter, InMemoryStore, Pipeline};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Contact repository that delegates to an [`InMemoryStore`] but can be told
/// to fail every write.
#[allow(dead_code)]
#[derive(Clone)]
pub struct FlakyContactStore {
    inner: InMemoryStore,
    fail_writes: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FlakyContactStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Other("mock write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for FlakyContactStore {
    async fn get(&self, id: &ContactId) -> StoreResult<Contact> {
        ContactRepository::get(&self.inner, id).await
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Contact>> {
        self.inner.find_one(filter).await
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<Vec<ContactWithImage>> {
        self.inner.aggregate(pipeline).await
    }

    async fn create(&self, contact: &Contact) -> StoreResult<Contact> {
        self.check_write()?;
        ContactRepository::create(&self.inner, contact).await
    }

    async fn update(&self, contact: &Contact) -> StoreResult<Contact> {
        self.check_write()?;
        ContactRepository::update(&self.inner, contact).await
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<()> {
        self.check_write()?;
        ContactRepository::delete(&self.inner, id).await
    }
}
