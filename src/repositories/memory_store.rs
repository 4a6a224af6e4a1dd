use crate::domain::ContactId;
use crate::error::{StoreError, StoreResult};
use crate::models::{Contact, ContactWithImage, Image};
use crate::repositories::query::{ContactRow, Filter, Pipeline, Stage};
use crate::repositories::traits::{ContactRepository, ImageRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collections {
    /// Insertion order is the store's natural order
    contacts: Vec<Contact>,
    images: HashMap<String, Image>,
}

impl Collections {
    fn position(&self, id: &ContactId) -> Option<usize> {
        self.contacts.iter().position(|c| &c.id == id)
    }

    /// Unique index on phone numbers and email, ignoring the contact itself.
    fn check_unique(&self, candidate: &Contact) -> StoreResult<()> {
        for existing in self.contacts.iter().filter(|c| c.id != candidate.id) {
            if let Some(number) = candidate
                .numbers()
                .find(|n| existing.numbers().any(|e| e == *n))
            {
                return Err(StoreError::DuplicateKey {
                    field: "phoneNumbers.number",
                    value: number.to_string(),
                });
            }

            if let (Some(a), Some(b)) = (&candidate.email, &existing.email) {
                if a == b {
                    return Err(StoreError::DuplicateKey {
                        field: "email",
                        value: a.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn run(&self, pipeline: &Pipeline) -> Vec<ContactRow> {
        let mut rows: Vec<ContactRow> = self.contacts.iter().cloned().map(ContactRow::new).collect();

        for stage in pipeline.stages() {
            match stage {
                Stage::LookupImage => {
                    for row in rows.iter_mut() {
                        row.image = self.images.get(&row.contact.image_id).cloned();
                    }
                }
                Stage::AddFullName => {
                    for row in rows.iter_mut() {
                        row.full_name = Some(row.contact.full_name());
                    }
                }
                Stage::Match(filter) => rows.retain(|row| filter.matches(row)),
                Stage::DropFullName => {
                    for row in rows.iter_mut() {
                        row.full_name = None;
                    }
                }
            }
        }

        rows
    }
}

/// In-process document store holding contacts and images.
///
/// Cloning is cheap and clones share the same data. Writes take the store's
/// write lock, so the uniqueness check and the write are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contact_count(&self) -> usize {
        self.inner.read().await.contacts.len()
    }

    pub async fn image_count(&self) -> usize {
        self.inner.read().await.images.len()
    }
}

fn contact_not_found(id: &ContactId) -> StoreError {
    StoreError::NotFound(format!("No contact with id: {}", id))
}

fn image_not_found(id: &str) -> StoreError {
    StoreError::NotFound(format!("No image with id: {}", id))
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn get(&self, id: &ContactId) -> StoreResult<Contact> {
        let data = self.inner.read().await;
        data.contacts
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| contact_not_found(id))
    }

    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Contact>> {
        let data = self.inner.read().await;
        let pipeline = Pipeline::new().matching(filter.clone());
        Ok(data.run(&pipeline).into_iter().next().map(|row| row.contact))
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<Vec<ContactWithImage>> {
        let data = self.inner.read().await;
        Ok(data.run(pipeline).into_iter().map(Into::into).collect())
    }

    async fn create(&self, contact: &Contact) -> StoreResult<Contact> {
        let mut data = self.inner.write().await;

        if data.position(&contact.id).is_some() {
            return Err(StoreError::DuplicateKey {
                field: "id",
                value: contact.id.to_string(),
            });
        }
        data.check_unique(contact)?;

        data.contacts.push(contact.clone());
        Ok(contact.clone())
    }

    async fn update(&self, contact: &Contact) -> StoreResult<Contact> {
        let mut data = self.inner.write().await;

        let index = data
            .position(&contact.id)
            .ok_or_else(|| contact_not_found(&contact.id))?;
        data.check_unique(contact)?;

        data.contacts[index] = contact.clone();
        Ok(contact.clone())
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        let index = data.position(id).ok_or_else(|| contact_not_found(id))?;
        data.contacts.remove(index);
        Ok(())
    }
}

#[async_trait]
impl ImageRepository for InMemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Image> {
        let data = self.inner.read().await;
        data.images.get(id).cloned().ok_or_else(|| image_not_found(id))
    }

    async fn create(&self, image: &Image) -> StoreResult<Image> {
        let mut data = self.inner.write().await;
        if data.images.contains_key(&image.id) {
            return Err(StoreError::DuplicateKey {
                field: "id",
                value: image.id.clone(),
            });
        }
        data.images.insert(image.id.clone(), image.clone());
        Ok(image.clone())
    }

    async fn update(&self, image: &Image) -> StoreResult<Image> {
        let mut data = self.inner.write().await;
        match data.images.get_mut(&image.id) {
            Some(existing) => {
                *existing = image.clone();
                Ok(image.clone())
            }
            None => Err(image_not_found(&image.id)),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        data.images
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| image_not_found(id))
    }
}
