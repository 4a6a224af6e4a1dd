//! Domain value objects and types.
//!
//! This module contains type-safe wrappers for domain concepts like
//! contact IDs, email addresses, and phone numbers. These value objects
//! provide validation at construction time and prevent invalid data from
//! being represented in the system.

pub mod birth_date;
pub mod contact_id;
pub mod email;
pub mod errors;
pub mod phone;

pub use birth_date::normalize_birth_date;
pub use contact_id::ContactId;
pub use email::EmailAddress;
pub use errors::ValidationError;
pub use phone::{validate_phone_numbers, PhoneEntry, PhoneLabel, PhoneNumber, ValidatedPhoneNumbers};
