//! Domain validation errors.

use std::fmt;

/// Errors that can occur while validating contact input.
///
/// The `Display` output is the message returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided ID is empty.
    EmptyId,

    /// Required fields (`firstName`, `phoneNumbers`) are missing.
    MissingFields,

    /// A contact was submitted for creation without an image file.
    MissingImage,

    /// `phoneNumbers` was supplied but is not a list.
    PhoneNumbersNotArray,

    /// A phone number entry has no `number`.
    MissingPhoneNumber,

    /// The provided phone number is invalid.
    InvalidPhone(String),

    /// The same number appears twice in one submission.
    DuplicatePhone(String),

    /// The phone label is not one of Mobile, Home, Work.
    InvalidPhoneLabel(String),

    /// The provided email address is invalid.
    InvalidEmail(String),

    /// The birth date could not be parsed as a calendar date.
    InvalidBirthDate(String),

    /// A text field exceeds its maximum length.
    FieldTooLong { field: &'static str, max: usize },

    /// The request body could not be decoded.
    MalformedBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "ID cannot be empty"),
            Self::MissingFields => write!(f, "Please provide all values"),
            Self::MissingImage => write!(f, "Please provide image"),
            Self::PhoneNumbersNotArray => {
                write!(f, "please provide phone numbers in correct format")
            }
            Self::MissingPhoneNumber => write!(f, "please provide correct phone number format"),
            Self::InvalidPhone(phone) => write!(f, "{} is not a valid phone number", phone),
            Self::DuplicatePhone(phone) => write!(
                f,
                "{} already exists. Please provide unique phone number",
                phone
            ),
            Self::InvalidPhoneLabel(label) => write!(
                f,
                "{} is not a valid phone label (expected Mobile, Home or Work)",
                label
            ),
            Self::InvalidEmail(_) => write!(f, "Please provide a valid email"),
            Self::InvalidBirthDate(value) => write!(f, "Invalid birth date: {}", value),
            Self::FieldTooLong { field, max } => {
                write!(f, "{} cannot be more than {} characters", field, max)
            }
            Self::MalformedBody(reason) => write!(f, "Malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
