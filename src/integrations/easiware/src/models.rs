//! Data models exchanged with the host and the remote API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Response of a dispatched call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, lower-cased names
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body, raw text when it is not JSON, null when empty
    pub body: Value,
}

impl ApiResponse {
    /// Body decoding used for every response
    pub fn parse_body(text: &str) -> Value {
        if text.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What an action hands back to the workflow.
///
/// The body alone when the status matched the action's expectation,
/// otherwise the full response so the workflow can branch on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionOutcome {
    Body(Value),
    Response(ApiResponse),
}

impl ActionOutcome {
    pub fn is_expected(&self) -> bool {
        matches!(self, ActionOutcome::Body(_))
    }

    /// JSON value handed to the host
    pub fn into_value(self) -> Value {
        match self {
            ActionOutcome::Body(body) => body,
            ActionOutcome::Response(response) => {
                serde_json::to_value(response).unwrap_or(Value::Null)
            }
        }
    }
}

/// Inbound webhook call delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookDelivery {
    /// Raw payload body
    pub body: Value,
    /// Request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Query-string parameters
    #[serde(default)]
    pub query_params: HashMap<String, String>,
}

impl WebhookDelivery {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}

/// Credential check result in the shape the host expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid<S: Into<String>>(error: S) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Loose JSON object as received from the host
pub type RawProps = Map<String, Value>;
