//! Read-only contact search by name or phone number.

use crate::error::ContactResult;
use crate::metrics::Metrics;
use crate::models::ContactWithImage;
use crate::repositories::{ContactRepository, Filter, Pipeline, TextPattern};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Search parameters. Both are optional; empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl SearchQuery {
    /// Build the read pipeline for this query, or `None` if nothing was asked for.
    ///
    /// A number takes precedence over a name when both are given.
    pub fn pipeline(&self) -> Option<Pipeline> {
        if let Some(number) = non_empty(&self.number) {
            return Some(
                Pipeline::new()
                    .lookup_image()
                    .matching(Filter::PhoneNumberMatches(TextPattern::contains(number))),
            );
        }

        non_empty(&self.name).map(|name| {
            Pipeline::new()
                .lookup_image()
                .add_full_name()
                .matching(Filter::FullNameMatches(TextPattern::contains(name)))
                .drop_full_name()
        })
    }
}

fn non_empty(term: &Option<String>) -> Option<&str> {
    term.as_deref().filter(|t| !t.is_empty())
}

/// Search service trait.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Contacts matching the query, with images joined, in store order.
    async fn search(&self, query: &SearchQuery) -> ContactResult<Vec<ContactWithImage>>;
}

/// Default implementation of SearchService.
pub struct SearchServiceImpl {
    contacts: Arc<dyn ContactRepository>,
    metrics: Metrics,
}

impl SearchServiceImpl {
    pub fn new(contacts: Arc<dyn ContactRepository>, metrics: Metrics) -> Self {
        Self { contacts, metrics }
    }
}

#[async_trait]
impl SearchService for SearchServiceImpl {
    async fn search(&self, query: &SearchQuery) -> ContactResult<Vec<ContactWithImage>> {
        self.metrics.record_search();

        let Some(pipeline) = query.pipeline() else {
            tracing::debug!("Empty search query");
            return Ok(Vec::new());
        };

        let results = self.contacts.aggregate(&pipeline).await?;
        tracing::debug!("Search {:?} matched {} contacts", query, results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::Stage;

    #[test]
    fn test_empty_query_has_no_pipeline() {
        assert!(SearchQuery::default().pipeline().is_none());

        let query = SearchQuery {
            name: Some(String::new()),
            number: Some(String::new()),
        };
        assert!(query.pipeline().is_none());
    }

    #[test]
    fn test_name_pipeline_stages() {
        let query = SearchQuery {
            name: Some("ann".to_string()),
            number: None,
        };
        let pipeline = query.pipeline().unwrap();
        assert_eq!(
            pipeline.stages(),
            &[
                Stage::LookupImage,
                Stage::AddFullName,
                Stage::Match(Filter::FullNameMatches(TextPattern::contains("ann"))),
                Stage::DropFullName,
            ]
        );
    }

    #[test]
    fn test_number_takes_precedence() {
        let query = SearchQuery {
            name: Some("ann".to_string()),
            number: Some("555".to_string()),
        };
        let pipeline = query.pipeline().unwrap();
        assert_eq!(
            pipeline.stages(),
            &[
                Stage::LookupImage,
                Stage::Match(Filter::PhoneNumberMatches(TextPattern::contains("555"))),
            ]
        );
    }
}
