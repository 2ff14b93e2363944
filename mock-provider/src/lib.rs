//! Mock provider for consumer-driven contract tests.
//!
//! # Overview
//! Register `Interaction`s (provider state, expected request, response
//! template), start the mock, point the consumer at `base_uri()`, then
//! `verify()` that every interaction was exercised and nothing else arrived.
//! `write_pact` records the contract as a Pact v2 JSON file.
//!
//! # Design
//! - `server::app` is a plain axum `Router`, testable with `oneshot`.
//! - `MockProvider::start` runs it on its own thread so blocking consumers can
//!   call it from the test thread.
//! - Response bodies are `Matchable` values: an example document plus type
//!   matchers that only surface in the pact file.

pub mod error;
pub mod interaction;
pub mod matchers;
pub mod pact;
pub mod provider;
pub mod server;

pub use error::{PactError, VerificationError};
pub use interaction::{ExpectedRequest, Interaction, ResponseTemplate};
pub use matchers::{Matchable, MatchingRule};
pub use pact::PactFile;
pub use provider::{MockProvider, RunningProvider};
pub use server::{app, run, Ledger, RecordedRequest};
