//! Pact v2 contract files.
//!
//! Written after a consumer test so the real provider can later be verified
//! against the same interactions; read back by the `mock-provider` binary to
//! replay them as a stub.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::PactError;
use crate::interaction::{ExpectedRequest, Interaction, ResponseTemplate};
use crate::matchers::{Matchable, MatchingRule};

pub const PACT_SPECIFICATION_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PactFile {
    pub consumer: Pacticipant,
    pub provider: Pacticipant,
    pub interactions: Vec<PactInteraction>,
    pub metadata: PactMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacticipant {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PactInteraction {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<String>,
    pub request: PactRequest,
    pub response: PactResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PactRequest {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PactResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matching_rules: BTreeMap<String, MatchingRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PactMetadata {
    pub pact_specification: PactSpecification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactSpecification {
    pub version: String,
}

impl PactFile {
    pub fn new(consumer: &str, provider: &str, interactions: &[Interaction]) -> Self {
        Self {
            consumer: Pacticipant {
                name: consumer.to_string(),
            },
            provider: Pacticipant {
                name: provider.to_string(),
            },
            interactions: interactions.iter().map(PactInteraction::from).collect(),
            metadata: PactMetadata {
                pact_specification: PactSpecification {
                    version: PACT_SPECIFICATION_VERSION.to_string(),
                },
            },
        }
    }

    /// `{consumer}-{provider}.json`
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.consumer.name, self.provider.name)
    }

    /// Write the pact into `dir`, creating it if needed. An existing file for
    /// the same pair is replaced.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, PactError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), interactions = self.interactions.len(), "wrote pact file");
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, PactError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Interactions for replay. Bodies become exact examples; matching rules
    /// only matter to provider verification.
    pub fn into_interactions(self) -> Vec<Interaction> {
        self.interactions
            .into_iter()
            .map(|i| Interaction {
                description: i.description,
                provider_state: i.provider_state,
                request: ExpectedRequest {
                    method: i.request.method.to_ascii_uppercase(),
                    path: i.request.path,
                    headers: i.request.headers.into_iter().collect(),
                    body: i.request.body,
                },
                response: ResponseTemplate {
                    status: i.response.status,
                    headers: i.response.headers.into_iter().collect(),
                    body: i.response.body.map(Matchable::Exact),
                },
            })
            .collect()
    }
}

impl From<&Interaction> for PactInteraction {
    fn from(interaction: &Interaction) -> Self {
        let response = &interaction.response;
        Self {
            description: interaction.description.clone(),
            provider_state: interaction.provider_state.clone(),
            request: PactRequest {
                method: interaction.request.method.clone(),
                path: interaction.request.path.clone(),
                headers: interaction.request.headers.iter().cloned().collect(),
                body: interaction.request.body.clone(),
            },
            response: PactResponse {
                status: response.status,
                headers: response.headers.iter().cloned().collect(),
                body: response.body.as_ref().map(Matchable::example),
                matching_rules: response
                    .body
                    .as_ref()
                    .map(Matchable::matching_rules)
                    .unwrap_or_default(),
            },
        }
    }
}
