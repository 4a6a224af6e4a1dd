//! Contact service layer.
//!
//! Create, update, delete and list contacts. Every write runs validation and
//! the uniqueness check before touching the image host or the store.

use crate::client::AsyncImageHost;
use crate::domain::{ContactId, ValidationError};
use crate::error::ContactResult;
use crate::metrics::Metrics;
use crate::models::{Contact, ContactPayload, ContactWithImage};
use crate::repositories::{ContactRepository, ImageRepository, Pipeline};
use crate::services::image_service::ImageService;
use crate::services::uniqueness::UniquenessChecker;
use crate::services::validation::{require_fields, validate_contact};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

/// Contact service trait for business operations.
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Create a contact. An image file is required.
    async fn create_contact(
        &self,
        payload: ContactPayload,
        file: Option<&Path>,
    ) -> ContactResult<ContactWithImage>;

    /// All contacts with their images, in store order.
    async fn list_contacts(&self) -> ContactResult<Vec<ContactWithImage>>;

    /// Update the submitted fields of a contact, replacing its image if a file is given.
    async fn update_contact(
        &self,
        id: &str,
        payload: ContactPayload,
        file: Option<&Path>,
    ) -> ContactResult<ContactWithImage>;

    /// Delete a contact together with its image.
    async fn delete_contact(&self, id: &str) -> ContactResult<()>;
}

/// Default implementation of ContactService.
pub struct ContactServiceImpl {
    contacts: Arc<dyn ContactRepository>,
    uniqueness: UniquenessChecker,
    images: ImageService,
    metrics: Metrics,
}

impl ContactServiceImpl {
    /// Create a new contact service.
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        images: Arc<dyn ImageRepository>,
        host: Arc<dyn AsyncImageHost>,
        metrics: Metrics,
    ) -> Self {
        Self {
            uniqueness: UniquenessChecker::new(contacts.clone()),
            images: ImageService::new(images, host),
            contacts,
            metrics,
        }
    }

    async fn existing(&self, id: &str) -> ContactResult<Contact> {
        let id = ContactId::new(id)?;
        Ok(self.contacts.get(&id).await?)
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn create_contact(
        &self,
        payload: ContactPayload,
        file: Option<&Path>,
    ) -> ContactResult<ContactWithImage> {
        require_fields(&payload)?;
        let file = file.ok_or(ValidationError::MissingImage)?;
        let validated = validate_contact(&payload)?;

        let email = validated.email.clone().flatten();
        self.uniqueness
            .ensure_unique(&validated.phones.numbers, email.as_ref(), None)
            .await?;

        let image = self.images.attach(file).await?;

        let now = Utc::now();
        let contact = Contact {
            id: ContactId::generate(),
            first_name: validated.first_name,
            last_name: validated.last_name.flatten(),
            phone_numbers: validated.phones.entries,
            email,
            birth_date: validated.birth_date.flatten(),
            company: validated.company.flatten(),
            image_id: image.id.clone(),
            created_at: now,
            updated_at: now,
        };

        let stored = match self.contacts.create(&contact).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Contact write failed, discarding image {}: {}", image.id, e);
                self.images.discard(&image).await;
                return Err(e.into());
            }
        };

        self.metrics.record_contact_created();
        tracing::info!("Created contact {}", stored.id);
        Ok(ContactWithImage::new(stored, Some(image)))
    }

    async fn list_contacts(&self) -> ContactResult<Vec<ContactWithImage>> {
        let contacts = self
            .contacts
            .aggregate(&Pipeline::new().lookup_image())
            .await?;
        tracing::debug!("Listed {} contacts", contacts.len());
        Ok(contacts)
    }

    async fn update_contact(
        &self,
        id: &str,
        payload: ContactPayload,
        file: Option<&Path>,
    ) -> ContactResult<ContactWithImage> {
        let mut contact = self.existing(id).await?;
        let validated = validate_contact(&payload)?;

        let email = validated.email.clone().flatten();
        self.uniqueness
            .ensure_unique(&validated.phones.numbers, email.as_ref(), Some(&contact.id))
            .await?;

        let current_image = self.images.find(&contact.image_id).await?;
        // A fresh image is owned by this update until the contact write lands
        let mut attached = None;
        let image = match (file, current_image) {
            (Some(path), Some(current)) => Some(self.images.replace(&current, path).await?),
            (Some(path), None) => {
                let fresh = self.images.attach(path).await?;
                contact.image_id = fresh.id.clone();
                attached = Some(fresh.clone());
                Some(fresh)
            }
            (None, current) => current,
        };

        contact.first_name = validated.first_name;
        contact.phone_numbers = validated.phones.entries;
        if let Some(last_name) = validated.last_name {
            contact.last_name = last_name;
        }
        if let Some(email) = validated.email {
            contact.email = email;
        }
        if let Some(birth_date) = validated.birth_date {
            contact.birth_date = birth_date;
        }
        if let Some(company) = validated.company {
            contact.company = company;
        }
        contact.updated_at = Utc::now();

        let stored = match self.contacts.update(&contact).await {
            Ok(stored) => stored,
            Err(e) => {
                if let Some(fresh) = &attached {
                    tracing::warn!("Contact write failed, discarding image {}: {}", fresh.id, e);
                    self.images.discard(fresh).await;
                }
                return Err(e.into());
            }
        };

        self.metrics.record_contact_updated();
        tracing::info!("Updated contact {}", stored.id);
        Ok(ContactWithImage::new(stored, image))
    }

    async fn delete_contact(&self, id: &str) -> ContactResult<()> {
        let contact = self.existing(id).await?;
        self.contacts.delete(&contact.id).await?;

        match self.images.find(&contact.image_id).await {
            Ok(Some(image)) => self.images.discard(&image).await,
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not look up image {}: {}", contact.image_id, e),
        }

        self.metrics.record_contact_deleted();
        tracing::info!("Deleted contact {}", contact.id);
        Ok(())
    }
}
