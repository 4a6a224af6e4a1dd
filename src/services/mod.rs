//! Application service layer.
//!
//! Services contain business logic and orchestrate interactions between
//! repositories and the image host. They provide a clean boundary between the
//! HTTP handlers and the data access layer.

mod contact_service;
mod image_service;
mod search_service;
mod uniqueness;
pub mod validation;

pub use contact_service::{ContactService, ContactServiceImpl};
pub use image_service::ImageService;
pub use search_service::{SearchQuery, SearchService, SearchServiceImpl};
pub use uniqueness::UniquenessChecker;
pub use validation::{validate_contact, ValidatedContact};
