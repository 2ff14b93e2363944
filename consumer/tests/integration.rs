//! Lookups against a live mock provider.
//!
//! # Design
//! Starts the mock provider on a random port, then exercises both consumer
//! operations over real HTTP through the default ureq transport.

use catalog_consumer::{ApiError, Consumer};
use chrono::NaiveDate;
use mock_provider::{Interaction, MockProvider, RunningProvider};
use serde_json::json;

fn start(interactions: Vec<Interaction>) -> RunningProvider {
    interactions
        .into_iter()
        .fold(MockProvider::new("catalog-consumer", "catalog-provider"), MockProvider::with_interaction)
        .start()
        .unwrap()
}

#[test]
fn user_lifecycle() {
    let provider = start(vec![
        Interaction::upon_receiving("Get user alice")
            .given("user alice exists")
            .with_request("GET", "/users/alice")
            .response_body(json!({"name": "Alice", "created_on": "2021-01-02T03:04:05"})),
        Interaction::upon_receiving("Get unknown user")
            .given("user nobody does not exist")
            .with_request("GET", "/users/nobody")
            .will_respond_with(404),
    ]);
    let consumer = Consumer::new(&provider.base_uri());

    let user = consumer.get_user("alice").unwrap().expect("alice exists");
    assert_eq!(user.name, "Alice");
    assert_eq!(
        user.created_on,
        NaiveDate::from_ymd_opt(2021, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap()
    );

    // Repeated lookups see the same record.
    let again = consumer.get_user("alice").unwrap();
    assert_eq!(again, Some(user));

    assert!(consumer.get_user("nobody").unwrap().is_none());

    provider.verify().unwrap();
}

#[test]
fn unknown_product_is_absent() {
    let provider = start(vec![Interaction::upon_receiving("Get unknown product")
        .given("product with ID 99 does not exist")
        .with_request("GET", "/product/99")
        .request_header("Authorization", "Bearer AAABd9yHUjI=")
        .will_respond_with(404)]);
    let consumer = Consumer::new(&provider.base_uri());

    assert!(consumer.get_product(99).unwrap().is_none());
    provider.verify().unwrap();
}

#[test]
fn server_error_without_record_is_deserialization_error() {
    let provider = start(vec![Interaction::upon_receiving("Get user during outage")
        .with_request("GET", "/users/alice")
        .will_respond_with(500)
        .response_body(json!({"error": "database unavailable"}))]);
    let consumer = Consumer::new(&provider.base_uri());

    let err = consumer.get_user("alice").unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)), "got {err}");
}

#[test]
fn stopped_provider_is_transport_error() {
    let provider = start(Vec::new());
    let base_uri = provider.base_uri();
    provider.stop().unwrap();

    let err = Consumer::new(&base_uri).get_product(10).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err}");
}
