//! Blocking client for the catalog provider's user and product endpoints.
//!
//! # Design
//! `Consumer` holds only its base URI and a `Transport`. Each lookup is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`; `get_*` runs one round trip
//! between the two. A 404 becomes `Ok(None)`. Every other status is parsed as
//! a record body, which is how the provider contract has always been consumed.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Product, User};

/// Bearer token sent with every product lookup.
pub const PRODUCT_API_TOKEN: &str = "AAABd9yHUjI=";

/// Client for `GET /users/{name}` and `GET /product/{id}`.
#[derive(Debug, Clone)]
pub struct Consumer<T = UreqTransport> {
    base_uri: String,
    transport: T,
}

impl Consumer {
    /// Build a consumer that talks to `base_uri` (scheme, host and port).
    pub fn new(base_uri: &str) -> Self {
        Self::with_transport(base_uri, UreqTransport::new())
    }
}

impl<T: Transport> Consumer<T> {
    pub fn with_transport(base_uri: &str, transport: T) -> Self {
        Self {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Fetch a user by name. `user_name` is placed in the path verbatim.
    pub fn get_user(&self, user_name: &str) -> Result<Option<User>, ApiError> {
        let response = self.transport.execute(self.build_get_user(user_name))?;
        self.parse_get_user(response)
    }

    /// Fetch a product by id.
    pub fn get_product(&self, product_id: i64) -> Result<Option<Product>, ApiError> {
        let response = self.transport.execute(self.build_get_product(product_id))?;
        self.parse_get_product(response)
    }

    pub fn build_get_user(&self, user_name: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/users/{user_name}", self.base_uri))
    }

    pub fn build_get_product(&self, product_id: i64) -> HttpRequest {
        HttpRequest::get(format!("{}/product/{product_id}", self.base_uri))
            .with_header("Authorization", &format!("Bearer {PRODUCT_API_TOKEN}"))
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<Option<User>, ApiError> {
        parse_record(response)
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Option<Product>, ApiError> {
        parse_record(response)
    }
}

/// 404 is absent; anything else must carry the record.
fn parse_record<R: DeserializeOwned>(response: HttpResponse) -> Result<Option<R>, ApiError> {
    if response.status == 404 {
        return Ok(None);
    }
    if !response.is_success() {
        warn!(status = response.status, "unexpected status, parsing body as a record");
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays one canned response and remembers every request it saw.
    struct CannedTransport {
        status: u16,
        body: &'static str,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    fn client() -> Consumer<CannedTransport> {
        Consumer::with_transport("http://localhost:1234", CannedTransport::new(404, ""))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_user_produces_unauthenticated_get() {
        let req = client().build_get_user("alice");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:1234/users/alice");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_user_does_not_escape_name() {
        let req = client().build_get_user("a/b?c");
        assert_eq!(req.url, "http://localhost:1234/users/a/b?c");
    }

    #[test]
    fn build_get_product_sends_bearer_token() {
        for id in [0, 10, -3, i64::MAX] {
            let req = client().build_get_product(id);
            assert_eq!(req.url, format!("http://localhost:1234/product/{id}"));
            assert_eq!(req.headers, vec![("Authorization".to_string(), "Bearer AAABd9yHUjI=".to_string())]);
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = Consumer::with_transport("http://localhost:1234/", CannedTransport::new(404, ""));
        assert_eq!(client.base_uri(), "http://localhost:1234");
        assert_eq!(client.build_get_product(10).url, "http://localhost:1234/product/10");
    }

    #[test]
    fn parse_get_user_success() {
        let user = client()
            .parse_get_user(response(200, r#"{"name":"Alice","created_on":"2021-01-02T03:04:05"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(
            user.created_on,
            NaiveDate::from_ymd_opt(2021, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap()
        );
    }

    #[test]
    fn parse_get_user_not_found_is_absent() {
        assert!(client().parse_get_user(response(404, "")).unwrap().is_none());
    }

    #[test]
    fn parse_get_user_not_found_ignores_body() {
        let result = client().parse_get_user(response(404, r#"{"error":"no such user"}"#));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn parse_get_user_bad_timestamp() {
        let err = client()
            .parse_get_user(response(200, r#"{"name":"Alice","created_on":"02/01/2021"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_get_user_missing_field() {
        let err = client().parse_get_user(response(200, r#"{"name":"Alice"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_get_product_success() {
        let product = client()
            .parse_get_product(response(200, r#"{"code":"CC_001","name":"28 Degrees","id":10}"#))
            .unwrap()
            .unwrap();
        assert_eq!(
            product,
            Product {
                code: "CC_001".to_string(),
                name: "28 Degrees".to_string(),
                id: 10,
            }
        );
    }

    #[test]
    fn parse_get_product_not_found_is_absent() {
        assert!(client().parse_get_product(response(404, "")).unwrap().is_none());
    }

    #[test]
    fn parse_get_product_bad_json() {
        let err = client().parse_get_product(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn server_error_with_record_body_still_parses() {
        let product = client()
            .parse_get_product(response(500, r#"{"code":"X","name":"Y","id":1}"#))
            .unwrap();
        assert_eq!(product.map(|p| p.id), Some(1));
    }

    #[test]
    fn server_error_with_plain_body_fails_to_parse() {
        let err = client().parse_get_product(response(500, "internal error")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn get_product_runs_one_round_trip() {
        let transport = CannedTransport::new(200, r#"{"code":"CC_001","name":"28 Degrees","id":10}"#);
        let client = Consumer::with_transport("http://localhost:1234", &transport);

        let first = client.get_product(10).unwrap();
        let second = client.get_product(10).unwrap();
        assert_eq!(first, second);

        let seen = transport.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|req| req.header("authorization") == Some("Bearer AAABd9yHUjI=")));
    }

    #[test]
    fn get_user_not_found() {
        let transport = CannedTransport::new(404, "");
        let client = Consumer::with_transport("http://localhost:1234", &transport);
        assert!(client.get_user("nobody").unwrap().is_none());
        assert_eq!(transport.seen.borrow()[0].url, "http://localhost:1234/users/nobody");
    }
}
