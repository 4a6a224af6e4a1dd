//! Contact model representing a person record.

use crate::domain::{ContactId, EmailAddress, PhoneEntry};
use crate::models::Image;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum length of `firstName` and `lastName`.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length of `company`.
pub const MAX_COMPANY_LEN: usize = 100;

/// A stored contact. The image is held by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique identifier for the contact
    pub id: ContactId,

    pub first_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    pub phone_numbers: Vec<PhoneEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,

    /// Always pinned to 06:30:00 UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Store identifier of the contact's [`Image`]
    #[serde(rename = "image")]
    pub image_id: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// `firstName + " " + lastName`, with a missing last name treated as empty.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or_default()
        )
    }

    /// Iterate over this contact's phone numbers.
    pub fn numbers(&self) -> impl Iterator<Item = &str> {
        self.phone_numbers.iter().map(|entry| entry.number.as_str())
    }
}

/// A contact with its image joined in, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactWithImage {
    pub id: ContactId,

    pub first_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    pub phone_numbers: Vec<PhoneEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// `None` only if the image record went missing from the store
    pub image: Option<Image>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ContactWithImage {
    /// Join a contact with its image record.
    pub fn new(contact: Contact, image: Option<Image>) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            phone_numbers: contact.phone_numbers,
            email: contact.email,
            birth_date: contact.birth_date,
            company: contact.company,
            image,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// Raw contact fields as submitted by a client, before validation.
///
/// Every field is optional here so that presence can be checked explicitly.
/// On update, a field that is `None` was not submitted and is left unchanged;
/// an empty string clears an optional field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Kept as raw JSON so a non-list value can be reported precisely
    pub phone_numbers: Option<Value>,
    pub email: Option<String>,
    pub birth_date: Option<String>,
    pub company: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PhoneLabel, PhoneNumber};
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_contact(last_name: Option<&str>) -> Contact {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Contact {
            id: ContactId::new("c1").unwrap(),
            first_name: "Anna".to_string(),
            last_name: last_name.map(str::to_string),
            phone_numbers: vec![PhoneEntry {
                number: PhoneNumber::new("5551234567").unwrap(),
                label: PhoneLabel::Home,
            }],
            email: None,
            birth_date: None,
            company: None,
            image_id: "img1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_contact(Some("Smith")).full_name(), "Anna Smith");
        assert_eq!(sample_contact(None).full_name(), "Anna ");
    }

    #[test]
    fn test_contact_serialization_shape() {
        let json = serde_json::to_value(sample_contact(Some("Smith"))).unwrap();
        assert_eq!(json["firstName"], "Anna");
        assert_eq!(json["lastName"], "Smith");
        assert_eq!(json["image"], "img1");
        assert_eq!(
            json["phoneNumbers"],
            json!([{"number": "5551234567", "label": "Home"}])
        );
        assert!(json.get("email").is_none());
        assert_eq!(json["createdAt"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_joined_contact_embeds_image() {
        let image = Image::new("pub", "https://img");
        let joined = ContactWithImage::new(sample_contact(None), Some(image.clone()));
        let json = serde_json::to_value(&joined).unwrap();
        assert_eq!(json["image"]["publicId"], "pub");
        assert_eq!(joined.image, Some(image));
    }

    #[test]
    fn test_payload_deserialization() {
        let payload: ContactPayload = serde_json::from_value(json!({
            "firstName": "Anna",
            "phoneNumbers": [{"number": "5551234567"}],
            "birthDate": "2020-01-15"
        }))
        .unwrap();
        assert_eq!(payload.first_name.as_deref(), Some("Anna"));
        assert!(payload.phone_numbers.unwrap().is_array());
        assert_eq!(payload.last_name, None);
    }
}
