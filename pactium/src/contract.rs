use crate::interaction::Interaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The persisted, fully-concretized record of a session's interactions,
/// used to verify the real provider later. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDocument {
    pub consumer: String,
    pub provider: String,
    pub interactions: Vec<ContractInteraction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInteraction {
    pub description: String,
    pub provider_state: String,
    pub request: ContractRequest,
    pub response: ContractResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ContractInteraction {
    /// Reduces a realized interaction to its concrete request/response
    /// pair, unwrapping every matcher to its example value.
    pub fn from_interaction(interaction: &Interaction) -> Self {
        let request = interaction.request();
        let response = interaction.response();

        ContractInteraction {
            description: interaction.description().into(),
            provider_state: interaction.provider_state().into(),
            request: ContractRequest {
                method: request.method.to_uppercase(),
                path: value_to_string(&request.path.unwrap_example()),
                query: request
                    .query
                    .iter()
                    .map(|(name, matcher)| {
                        (name.clone(), value_to_string(&matcher.unwrap_example()))
                    })
                    .collect(),
                headers: request
                    .headers
                    .iter()
                    .map(|(name, matcher)| {
                        (name.clone(), value_to_string(&matcher.unwrap_example()))
                    })
                    .collect(),
                body: request.body.as_ref().map(|matcher| matcher.unwrap_example()),
            },
            response: ContractResponse {
                status: response.status,
                headers: response.headers.clone(),
                body: response.body.as_ref().map(|matcher| matcher.unwrap_example()),
            },
        }
    }
}

// string values stay bare, anything else keeps its JSON rendering
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
