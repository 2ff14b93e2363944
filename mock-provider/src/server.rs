//! HTTP front of the mock provider.
//!
//! # Design
//! Every request lands in one fallback handler. The `Ledger` finds the first
//! registered interaction whose `ExpectedRequest` matches, counts the hit and
//! hands back the response template. Requests nothing matches are kept for
//! `verify` and answered with a 500 describing what arrived.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::error::VerificationError;
use crate::interaction::{Interaction, ResponseTemplate};

/// A request that matched no interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug, Default)]
struct LedgerState {
    interactions: Vec<Interaction>,
    hits: Vec<usize>,
    unexpected: Vec<RecordedRequest>,
}

/// Registered interactions plus what the mock has seen so far.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    state: Arc<Mutex<LedgerState>>,
}

impl Ledger {
    pub fn new(interactions: Vec<Interaction>) -> Self {
        let hits = vec![0; interactions.len()];
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                interactions,
                hits,
                unexpected: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // A panicking handler leaves the counters consistent; keep serving.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.lock().interactions.clone()
    }

    /// Times each interaction was matched, in registration order.
    pub fn hits(&self) -> Vec<usize> {
        self.lock().hits.clone()
    }

    pub fn unexpected_requests(&self) -> Vec<RecordedRequest> {
        self.lock().unexpected.clone()
    }

    /// Match one incoming request. Returns the response to send, or `None`
    /// after recording the request as unexpected.
    pub fn record(&self, method: &str, path: &str, headers: &HeaderMap, body: &[u8]) -> Option<ResponseTemplate> {
        let mut state = self.lock();
        let found = state
            .interactions
            .iter()
            .position(|i| i.request.matches(method, path, headers, body));

        match found {
            Some(index) => {
                state.hits[index] += 1;
                let interaction = &state.interactions[index];
                debug!(description = %interaction.description, %method, %path, "matched interaction");
                Some(interaction.response.clone())
            }
            None => {
                warn!(%method, %path, "request matched no interaction");
                state.unexpected.push(RecordedRequest {
                    method: method.to_string(),
                    path: path.to_string(),
                    headers: headers
                        .iter()
                        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
                        .collect(),
                    body: String::from_utf8_lossy(body).into_owned(),
                });
                None
            }
        }
    }

    /// Succeeds when every interaction was exercised and nothing unexpected
    /// arrived.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let state = self.lock();
        let missing: Vec<String> = state
            .interactions
            .iter()
            .zip(&state.hits)
            .filter(|(_, hits)| **hits == 0)
            .map(|(i, _)| i.description.clone())
            .collect();

        if missing.is_empty() && state.unexpected.is_empty() {
            return Ok(());
        }
        Err(VerificationError {
            missing,
            unexpected: state.unexpected.clone(),
        })
    }
}

pub fn app(ledger: Ledger) -> Router {
    Router::new().fallback(replay).with_state(ledger)
}

pub async fn run(listener: TcpListener, ledger: Ledger) -> Result<(), std::io::Error> {
    axum::serve(listener, app(ledger)).await
}

async fn replay(State(ledger): State<Ledger>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    match ledger.record(method.as_str(), uri.path(), &headers, &body) {
        Some(template) => render(&template),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "unexpected request",
                "method": method.as_str(),
                "path": uri.path(),
            })),
        )
            .into_response(),
    }
}

fn render(template: &ResponseTemplate) -> Response {
    let status = StatusCode::from_u16(template.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = axum::http::Response::builder().status(status);
    for (name, value) in &template.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = match &template.body {
        Some(body) => {
            let has_content_type = template
                .headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(header::CONTENT_TYPE.as_str()));
            if !has_content_type {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
            }
            Body::from(body.example().to_string())
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .unwrap_or_else(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
}
