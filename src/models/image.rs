//! Image metadata model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a profile image stored on the external image host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Store identifier
    pub id: String,

    /// Identifier on the image host; stable across overwrites
    pub public_id: String,

    /// Servable URL of the current asset
    pub image_url: String,
}

impl Image {
    /// Create image metadata with a fresh store identifier.
    pub fn new(public_id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            public_id: public_id.into(),
            image_url: image_url.into(),
        }
    }
}
