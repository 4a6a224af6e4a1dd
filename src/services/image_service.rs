//! Image association: uploads profile images and keeps their metadata in the store.

use crate::client::AsyncImageHost;
use crate::error::{ContactResult, StoreError};
use crate::models::Image;
use crate::repositories::ImageRepository;
use std::path::Path;
use std::sync::Arc;

/// Manages the image owned by each contact.
#[derive(Clone)]
pub struct ImageService {
    images: Arc<dyn ImageRepository>,
    host: Arc<dyn AsyncImageHost>,
}

impl ImageService {
    pub fn new(images: Arc<dyn ImageRepository>, host: Arc<dyn AsyncImageHost>) -> Self {
        Self { images, host }
    }

    /// Upload `path` as a new asset and store its metadata.
    pub async fn attach(&self, path: &Path) -> ContactResult<Image> {
        let uploaded = self.host.upload(path).await?;
        let image = Image::new(uploaded.public_id, uploaded.secure_url);

        match self.images.create(&image).await {
            Ok(stored) => {
                tracing::debug!("Attached image {} ({})", stored.id, stored.public_id);
                Ok(stored)
            }
            Err(e) => {
                self.destroy_remote(&image.public_id).await;
                Err(e.into())
            }
        }
    }

    /// Overwrite the asset behind `image` with `path` and update the record in place.
    ///
    /// The public id and store id stay the same; only the URL may change.
    pub async fn replace(&self, image: &Image, path: &Path) -> ContactResult<Image> {
        let uploaded = self.host.upload_overwrite(&image.public_id, path).await?;
        let updated = Image {
            image_url: uploaded.secure_url,
            ..image.clone()
        };

        let stored = self.images.update(&updated).await?;
        tracing::debug!("Replaced image {} ({})", stored.id, stored.public_id);
        Ok(stored)
    }

    /// Look up an image record, treating a missing one as `None`.
    pub async fn find(&self, id: &str) -> ContactResult<Option<Image>> {
        match self.images.get(id).await {
            Ok(image) => Ok(Some(image)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the record and the remote asset. Failures are logged, not returned.
    pub async fn discard(&self, image: &Image) {
        if let Err(e) = self.images.delete(&image.id).await {
            tracing::warn!("Failed to remove image record {}: {}", image.id, e);
        }
        self.destroy_remote(&image.public_id).await;
    }

    async fn destroy_remote(&self, public_id: &str) {
        if let Err(e) = self.host.destroy(public_id).await {
            tracing::warn!("Failed to destroy remote image {}: {}", public_id, e);
        }
    }
}
