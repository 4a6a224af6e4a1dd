//! Tests for name and number search over stored contacts.

mod mocks;

use contacts_backend::repositories::ContactRepository;
use contacts_backend::services::{ContactService, SearchQuery, SearchService, SearchServiceImpl};
use mocks::{image_file, payload, Harness};
use serde_json::json;
use std::sync::Arc;

async fn seeded() -> (Harness, SearchServiceImpl) {
    let h = Harness::new();
    let file = image_file();

    for (first, last, number) in [
        ("Anna", Some("Smith"), "5551234567"),
        ("Bob", None, "4440001111"),
        ("Joanna", Some("Berg"), "3335550000"),
        ("Dr.", Some("Who"), "2223334444"),
    ] {
        h.service
            .create_contact(
                payload(first, last, json!([{ "number": number }])),
                Some(file.path()),
            )
            .await
            .unwrap();
    }

    let contacts = Arc::new(h.store.clone()) as Arc<dyn ContactRepository>;
    let search = SearchServiceImpl::new(contacts, h.metrics.clone());
    (h, search)
}

fn by_name(name: &str) -> SearchQuery {
    SearchQuery {
        name: Some(name.to_string()),
        number: None,
    }
}

fn by_number(number: &str) -> SearchQuery {
    SearchQuery {
        name: None,
        number: Some(number.to_string()),
    }
}

fn first_names(results: &[contacts_backend::ContactWithImage]) -> Vec<&str> {
    results.iter().map(|c| c.first_name.as_str()).collect()
}

#[tokio::test]
async fn test_name_search_is_case_insensitive_substring() {
    let (_h, search) = seeded().await;

    let results = search.search(&by_name("ann")).await.unwrap();
    assert_eq!(first_names(&results), vec!["Anna", "Joanna"]);
    assert!(results.iter().all(|c| c.image.is_some()));
}

#[tokio::test]
async fn test_name_search_spans_first_and_last_name() {
    let (_h, search) = seeded().await;

    let results = search.search(&by_name("a s")).await.unwrap();
    assert_eq!(first_names(&results), vec!["Anna"]);

    // Missing last name still has the separating space
    let results = search.search(&by_name("bob ")).await.unwrap();
    assert_eq!(first_names(&results), vec!["Bob"]);
}

#[tokio::test]
async fn test_name_search_is_literal() {
    let (_h, search) = seeded().await;

    let results = search.search(&by_name("dr.")).await.unwrap();
    assert_eq!(first_names(&results), vec!["Dr."]);

    let results = search.search(&by_name("a.n")).await.unwrap();
    assert!(results.is_empty());

    let results = search.search(&by_name("(")).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_number_search_matches_partial_digits() {
    let (_h, search) = seeded().await;

    let results = search.search(&by_number("555")).await.unwrap();
    assert_eq!(first_names(&results), vec!["Anna", "Joanna"]);

    let results = search.search(&by_number("1111")).await.unwrap();
    assert_eq!(first_names(&results), vec!["Bob"]);
}

#[tokio::test]
async fn test_number_takes_precedence_over_name() {
    let (_h, search) = seeded().await;

    let query = SearchQuery {
        name: Some("anna".to_string()),
        number: Some("444".to_string()),
    };
    let results = search.search(&query).await.unwrap();
    assert_eq!(first_names(&results), vec!["Bob", "Dr."]);
}

#[tokio::test]
async fn test_search_without_terms_is_empty() {
    let (h, search) = seeded().await;

    assert!(search.search(&SearchQuery::default()).await.unwrap().is_empty());

    let blank = SearchQuery {
        name: Some(String::new()),
        number: Some(String::new()),
    };
    assert!(search.search(&blank).await.unwrap().is_empty());

    assert_eq!(h.metrics.searches_total(), 2);
}

#[tokio::test]
async fn test_search_hides_derived_full_name() {
    let (_h, search) = seeded().await;

    let results = search.search(&by_name("smith")).await.unwrap();
    let json = serde_json::to_value(&results[0]).unwrap();
    assert!(json.get("fullName").is_none());
    assert_eq!(json["image"]["publicId"], "contacts/mock-1");
}
