use thiserror::Error;

use crate::server::RecordedRequest;

/// The consumer did not exercise the registered interactions exactly.
#[derive(Debug, Error, PartialEq)]
#[error(
    "pact verification failed: {} interaction(s) not exercised, {} unexpected request(s)",
    .missing.len(),
    .unexpected.len()
)]
pub struct VerificationError {
    /// Descriptions of interactions that never received a request.
    pub missing: Vec<String>,
    pub unexpected: Vec<RecordedRequest>,
}

#[derive(Debug, Error)]
pub enum PactError {
    #[error("pact file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("pact file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
