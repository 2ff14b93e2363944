//! Expected request / canned response pairs.

use axum::http::HeaderMap;
use serde_json::Value;

use crate::matchers::Matchable;

/// One registered expectation: when `request` arrives, answer with
/// `response`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub description: String,
    pub provider_state: Option<String>,
    pub request: ExpectedRequest,
    pub response: ResponseTemplate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedRequest {
    /// Upper-case method name.
    pub method: String,
    pub path: String,
    /// Headers that must be present. Other headers are ignored.
    pub headers: Vec<(String, String)>,
    /// JSON body the request must carry, if any.
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTemplate {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Matchable>,
}

impl Interaction {
    /// Start an interaction expecting `GET /` and answering an empty 200.
    pub fn upon_receiving(description: &str) -> Self {
        Self {
            description: description.to_string(),
            provider_state: None,
            request: ExpectedRequest {
                method: "GET".to_string(),
                path: "/".to_string(),
                headers: Vec::new(),
                body: None,
            },
            response: ResponseTemplate {
                status: 200,
                headers: Vec::new(),
                body: None,
            },
        }
    }

    pub fn given(mut self, provider_state: &str) -> Self {
        self.provider_state = Some(provider_state.to_string());
        self
    }

    pub fn with_request(mut self, method: &str, path: &str) -> Self {
        self.request.method = method.to_ascii_uppercase();
        self.request.path = path.to_string();
        self
    }

    pub fn request_header(mut self, name: &str, value: &str) -> Self {
        self.request.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn request_body(mut self, body: Value) -> Self {
        self.request.body = Some(body);
        self
    }

    pub fn will_respond_with(mut self, status: u16) -> Self {
        self.response.status = status;
        self
    }

    pub fn response_header(mut self, name: &str, value: &str) -> Self {
        self.response.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn response_body(mut self, body: impl Into<Matchable>) -> Self {
        self.response.body = Some(body.into());
        self
    }
}

impl ExpectedRequest {
    pub fn matches(&self, method: &str, path: &str, headers: &HeaderMap, body: &[u8]) -> bool {
        if !self.method.eq_ignore_ascii_case(method) || self.path != path {
            return false;
        }
        let headers_match = self.headers.iter().all(|(name, expected)| {
            headers
                .get_all(name.as_str())
                .iter()
                .any(|actual| actual.as_bytes() == expected.as_bytes())
        });
        if !headers_match {
            return false;
        }
        match &self.body {
            None => true,
            Some(expected) => serde_json::from_slice::<Value>(body).is_ok_and(|actual| &actual == expected),
        }
    }
}
