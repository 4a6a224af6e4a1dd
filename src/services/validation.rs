//! Field validation for submitted contacts.
//!
//! Turns a raw [`ContactPayload`] into a [`ValidatedContact`] or the first
//! [`ValidationError`] found. Pure; no store access.

use crate::domain::{
    normalize_birth_date, validate_phone_numbers, EmailAddress, ValidatedPhoneNumbers,
    ValidationError,
};
use crate::models::{ContactPayload, MAX_COMPANY_LEN, MAX_NAME_LEN};
use chrono::{DateTime, Utc};

/// A payload that passed validation.
///
/// Optional fields are doubly wrapped: the outer `Option` says whether the
/// field was submitted at all, the inner one whether it holds a value. An
/// empty string submits `Some(None)`, which clears the field on update.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedContact {
    pub first_name: String,
    pub last_name: Option<Option<String>>,
    pub phones: ValidatedPhoneNumbers,
    pub email: Option<Option<EmailAddress>>,
    pub birth_date: Option<Option<DateTime<Utc>>>,
    pub company: Option<Option<String>>,
}

/// Check that `firstName` and `phoneNumbers` were submitted.
///
/// An empty `phoneNumbers` list counts as submitted.
pub fn require_fields(payload: &ContactPayload) -> Result<(), ValidationError> {
    let has_first_name = payload
        .first_name
        .as_deref()
        .map(|name| !name.trim().is_empty())
        .unwrap_or(false);
    let has_phone_numbers = payload
        .phone_numbers
        .as_ref()
        .map(|value| !value.is_null())
        .unwrap_or(false);

    if has_first_name && has_phone_numbers {
        Ok(())
    } else {
        Err(ValidationError::MissingFields)
    }
}

/// Validate every submitted field.
///
/// Checks run in order: required fields, lengths, email format, birth date,
/// then the phone number list.
pub fn validate_contact(payload: &ContactPayload) -> Result<ValidatedContact, ValidationError> {
    require_fields(payload)?;

    let first_name = payload
        .first_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    check_length("firstName", &first_name, MAX_NAME_LEN)?;

    let last_name = optional_text(payload.last_name.as_deref());
    if let Some(Some(last)) = &last_name {
        check_length("lastName", last, MAX_NAME_LEN)?;
    }

    let company = optional_text(payload.company.as_deref());
    if let Some(Some(company)) = &company {
        check_length("company", company, MAX_COMPANY_LEN)?;
    }

    let email = match optional_text(payload.email.as_deref()) {
        Some(Some(raw)) => Some(Some(EmailAddress::new(raw)?)),
        Some(None) => Some(None),
        None => None,
    };

    let birth_date = match optional_text(payload.birth_date.as_deref()) {
        Some(Some(raw)) => Some(Some(normalize_birth_date(&raw)?)),
        Some(None) => Some(None),
        None => None,
    };

    let phones = match &payload.phone_numbers {
        Some(value) => validate_phone_numbers(value)?,
        None => return Err(ValidationError::MissingFields),
    };

    Ok(ValidatedContact {
        first_name,
        last_name,
        phones,
        email,
        birth_date,
        company,
    })
}

fn optional_text(value: Option<&str>) -> Option<Option<String>> {
    value.map(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}
