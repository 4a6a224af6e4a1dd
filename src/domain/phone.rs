//! Phone number value objects and list validation.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Number of digits in a valid phone number.
pub const PHONE_NUMBER_LEN: usize = 10;

/// A type-safe wrapper for phone numbers.
///
/// A valid number is exactly ten ASCII digits with no formatting characters
/// or surrounding whitespace.
///
/// # Example
///
/// ```
/// use contacts_backend::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("5551234567").unwrap();
/// assert_eq!(phone.as_str(), "5551234567");
/// assert!(PhoneNumber::new("555-123-45").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the number is not exactly
    /// ten digits.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
        let phone = phone.into();

        if !Self::is_valid(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(phone))
    }

    fn is_valid(phone: &str) -> bool {
        phone.len() == PHONE_NUMBER_LEN && phone.chars().all(|c| c.is_ascii_digit())
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of phone line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhoneLabel {
    #[default]
    Mobile,
    Home,
    Work,
}

impl FromStr for PhoneLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mobile" => Ok(Self::Mobile),
            "Home" => Ok(Self::Home),
            "Work" => Ok(Self::Work),
            other => Err(ValidationError::InvalidPhoneLabel(other.to_string())),
        }
    }
}

/// A labelled phone number stored on a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub number: PhoneNumber,
    #[serde(default)]
    pub label: PhoneLabel,
}

/// Output of [`validate_phone_numbers`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedPhoneNumbers {
    /// Entries in submission order.
    pub entries: Vec<PhoneEntry>,
    /// The distinct numbers, used for cross-contact uniqueness checks.
    pub numbers: Vec<String>,
}

/// Validate a submitted `phoneNumbers` value.
///
/// Fails on the first problem found: the value is not a list, an entry has no
/// `number`, a number is not ten digits, a number repeats within the list, or a
/// label is not recognised. Entries without a label default to `Mobile`.
pub fn validate_phone_numbers(value: &Value) -> Result<ValidatedPhoneNumbers, ValidationError> {
    let items = value
        .as_array()
        .ok_or(ValidationError::PhoneNumbersNotArray)?;

    let mut seen = HashSet::with_capacity(items.len());
    let mut validated = ValidatedPhoneNumbers::default();

    for item in items {
        let number = match item.get("number") {
            None | Some(Value::Null) => return Err(ValidationError::MissingPhoneNumber),
            Some(Value::String(s)) if s.is_empty() => {
                return Err(ValidationError::MissingPhoneNumber)
            }
            Some(Value::String(s)) => PhoneNumber::new(s.as_str())?,
            Some(other) => return Err(ValidationError::InvalidPhone(other.to_string())),
        };

        if !seen.insert(number.as_str().to_string()) {
            return Err(ValidationError::DuplicatePhone(number.into_string()));
        }

        let label = match item.get("label") {
            None | Some(Value::Null) => PhoneLabel::default(),
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(ValidationError::InvalidPhoneLabel(other.to_string())),
        };

        validated.numbers.push(number.as_str().to_string());
        validated.entries.push(PhoneEntry { number, label });
    }

    Ok(validated)
}
