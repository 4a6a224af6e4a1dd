//! Cross-contact uniqueness checks.

use crate::domain::{ContactId, EmailAddress};
use crate::error::{duplicate_message, ContactError, ContactResult};
use crate::repositories::{ContactRepository, Filter};
use std::sync::Arc;

/// Rejects phone numbers and emails already used by another contact.
#[derive(Clone)]
pub struct UniquenessChecker {
    contacts: Arc<dyn ContactRepository>,
}

impl UniquenessChecker {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    /// Fail with a conflict if any of `numbers` or `email` belongs to a
    /// contact other than `exclude`.
    ///
    /// Issues at most two store queries: phone numbers first, then email.
    pub async fn ensure_unique(
        &self,
        numbers: &[String],
        email: Option<&EmailAddress>,
        exclude: Option<&ContactId>,
    ) -> ContactResult<()> {
        if !numbers.is_empty() {
            let filter = Self::excluding(Filter::PhoneNumberIn(numbers.to_vec()), exclude);
            if let Some(existing) = self.contacts.find_one(&filter).await? {
                tracing::debug!("Phone number already used by contact {}", existing.id);
                return Err(ContactError::Conflict(duplicate_message("phoneNumbers.number")));
            }
        }

        if let Some(email) = email {
            let filter = Self::excluding(Filter::EmailEquals(email.as_str().to_string()), exclude);
            if let Some(existing) = self.contacts.find_one(&filter).await? {
                tracing::debug!("Email already used by contact {}", existing.id);
                return Err(ContactError::Conflict(duplicate_message("email")));
            }
        }

        Ok(())
    }

    fn excluding(filter: Filter, exclude: Option<&ContactId>) -> Filter {
        match exclude {
            Some(id) => Filter::And(vec![filter, Filter::IdNotEqual(id.clone())]),
            None => filter,
        }
    }
}
