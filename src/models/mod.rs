//! Data models for contacts and their images.

pub mod contact;
pub mod image;

pub use contact::{Contact, ContactPayload, ContactWithImage, MAX_COMPANY_LEN, MAX_NAME_LEN};
pub use image::Image;
