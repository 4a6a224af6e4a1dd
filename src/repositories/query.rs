//! Store-agnostic query description.
//!
//! A [`Pipeline`] is an ordered list of named [`Stage`]s. Each store decides
//! how to execute it; the in-memory store interprets the stages directly.

use crate::domain::ContactId;
use crate::models::{Contact, ContactWithImage, Image};

/// A case-insensitive literal substring pattern.
///
/// The text is matched literally; regex metacharacters in user input have no
/// special meaning.
#[derive(Debug, Clone)]
pub struct TextPattern {
    text: String,
    folded: String,
}

impl TextPattern {
    /// Build a pattern matching `text` anywhere, ignoring case.
    pub fn contains(text: &str) -> Self {
        Self {
            text: text.to_string(),
            folded: text.to_lowercase(),
        }
    }

    /// The literal text being searched for.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// A predicate over contact documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Any of the contact's numbers is in the set
    PhoneNumberIn(Vec<String>),
    /// Any of the contact's numbers contains the pattern
    PhoneNumberMatches(TextPattern),
    /// Email equals the value exactly
    EmailEquals(String),
    /// The derived full name contains the pattern; requires [`Stage::AddFullName`]
    FullNameMatches(TextPattern),
    /// Excludes one contact
    IdNotEqual(ContactId),
    /// All filters hold
    And(Vec<Filter>),
}

impl Filter {
    /// Evaluate against a pipeline row.
    pub fn matches(&self, row: &ContactRow) -> bool {
        let contact = &row.contact;
        match self {
            Filter::PhoneNumberIn(numbers) => contact
                .numbers()
                .any(|n| numbers.iter().any(|candidate| candidate == n)),
            Filter::PhoneNumberMatches(pattern) => contact.numbers().any(|n| pattern.is_match(n)),
            Filter::EmailEquals(email) => contact
                .email
                .as_ref()
                .map(|e| e.as_str() == email)
                .unwrap_or(false),
            Filter::FullNameMatches(pattern) => row
                .full_name
                .as_deref()
                .map(|name| pattern.is_match(name))
                .unwrap_or(false),
            Filter::IdNotEqual(id) => &contact.id != id,
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
        }
    }
}

/// One step of a read pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Join the referenced image
    LookupImage,
    /// Derive `firstName + " " + lastName`
    AddFullName,
    /// Keep only rows matching the filter
    Match(Filter),
    /// Remove the derived full name from the projection
    DropFullName,
}

/// An ordered read pipeline over contacts.
///
/// ```
/// use contacts_backend::repositories::{Filter, Pipeline, TextPattern};
///
/// let pipeline = Pipeline::new()
///     .lookup_image()
///     .add_full_name()
///     .matching(Filter::FullNameMatches(TextPattern::contains("ann")))
///     .drop_full_name();
/// assert_eq!(pipeline.stages().len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_image(self) -> Self {
        self.stage(Stage::LookupImage)
    }

    pub fn add_full_name(self) -> Self {
        self.stage(Stage::AddFullName)
    }

    pub fn matching(self, filter: Filter) -> Self {
        self.stage(Stage::Match(filter))
    }

    pub fn drop_full_name(self) -> Self {
        self.stage(Stage::DropFullName)
    }

    fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// Intermediate document flowing through a pipeline.
#[derive(Debug, Clone)]
pub struct ContactRow {
    pub contact: Contact,
    pub image: Option<Image>,
    pub full_name: Option<String>,
}

impl ContactRow {
    pub fn new(contact: Contact) -> Self {
        Self {
            contact,
            image: None,
            full_name: None,
        }
    }
}

impl From<ContactRow> for ContactWithImage {
    fn from(row: ContactRow) -> Self {
        ContactWithImage::new(row.contact, row.image)
    }
}
