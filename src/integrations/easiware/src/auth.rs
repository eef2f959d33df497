//! Credentials for the Easiware API
//!
//! A configured instance holds the API root URL and an API key. Validation
//! is a single probe against `/v1/auth/info`; any failure, whether the key was
//! rejected or the host was unreachable, is reported the same way.

use crate::error::PieceResult;
use crate::models::AuthValidation;
use crate::props::Property;
use crate::request::ApiRequest;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

pub const DEFAULT_APP_URL: &str = "https://api.easiware.com";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Please provide correct API URL and API key.";

const AUTH_DESCRIPTION: &str = r#"
  **Enable API key:**
  1. Login to your easiware account
  2. On the Bottom-left, click on Parameters
  3. Select 'General'
  4. Select 'API key management'
  5. On the right panel, click on '+' Generate a new key
  6. Enter the 'API key Label' to name the key
  7. Click on 'Generate a new key'
  8. Copy the API key and paste it below.

  **APP URL:**
  - The API URL for easiware example the cloud is at https://app.easiware.com
"#;

/// Credential pair of a configured piece instance
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EasiwareAuth {
    pub app_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for EasiwareAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EasiwareAuth")
            .field("app_url", &self.app_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl EasiwareAuth {
    pub fn new<U: Into<String>, K: Into<String>>(app_url: U, api_key: K) -> Self {
        Self {
            app_url: app_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Probe the auth-info endpoint with these credentials.
    pub async fn validate(&self, http: &Client) -> AuthValidation {
        match self.probe(http).await {
            Ok(status) if status.is_success() => {
                debug!(app_url = %self.app_url, "Easiware credentials accepted");
                AuthValidation::valid()
            }
            Ok(status) => {
                warn!(
                    app_url = %self.app_url,
                    status = status.as_u16(),
                    "Easiware credentials rejected"
                );
                AuthValidation::invalid(INVALID_CREDENTIALS_MESSAGE)
            }
            Err(e) => {
                warn!(app_url = %self.app_url, error = %e, "Easiware credential probe failed");
                AuthValidation::invalid(INVALID_CREDENTIALS_MESSAGE)
            }
        }
    }

    async fn probe(&self, http: &Client) -> PieceResult<reqwest::StatusCode> {
        let url = ApiRequest::get("/v1/auth/info").url(&self.app_url)?;
        let response = http
            .get(url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        Ok(response.status())
    }
}

/// Auth form the host renders when the piece is connected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSchema {
    pub description: String,
    pub required: bool,
    pub props: Vec<Property>,
}

impl AuthSchema {
    pub fn easiware() -> Self {
        Self {
            description: AUTH_DESCRIPTION.to_string(),
            required: true,
            props: vec![
                Property::short_text("appUrl", "Api URL")
                    .with_description("Enter the api URL")
                    .with_default(json!(DEFAULT_APP_URL))
                    .required(),
                Property::short_text("apiKey", "API Key")
                    .with_description("Enter the API key")
                    .required(),
            ],
        }
    }
}
