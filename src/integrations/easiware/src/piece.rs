//! Piece entry points
//!
//! [`EasiwarePiece`] is what a host embeds: it owns the shared connection pool
//! and metrics, exposes the manifest, and runs actions and trigger lifecycle
//! calls by name.

use crate::actions::{registered_actions, Action, ActionContext, ActionDefinition};
use crate::auth::{AuthSchema, EasiwareAuth};
use crate::client::EasiwareClient;
use crate::config::{HttpConfig, PieceConfig};
use crate::error::{PieceError, PieceResult};
use crate::metrics::DispatchMetrics;
use crate::models::{ActionOutcome, AuthValidation, WebhookDelivery};
use crate::triggers::{registered_triggers, TriggerContext, TriggerDefinition, WebhookTrigger};
use crate::utils::StringUtils;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub const DISPLAY_NAME: &str = "Easiware";
pub const DESCRIPTION: &str = "Lovely customer support software";
pub const LOGO_URL: &str = "https://app-staging.easiware.com/images/easiware-heart.svg";
pub const MINIMUM_SUPPORTED_RELEASE: &str = "0.36.1";

static MANIFEST: Lazy<PieceManifest> = Lazy::new(|| PieceManifest {
    display_name: DISPLAY_NAME,
    description: DESCRIPTION,
    logo_url: LOGO_URL,
    minimum_supported_release: MINIMUM_SUPPORTED_RELEASE,
    categories: vec!["CUSTOMER_SUPPORT"],
    authors: vec!["stefapi"],
    auth: AuthSchema::easiware(),
    actions: registered_actions().iter().map(|a| a.definition()).collect(),
    triggers: registered_triggers().iter().map(|t| t.definition()).collect(),
});

/// Everything the host reads to list and render the piece
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceManifest {
    pub display_name: &'static str,
    pub description: &'static str,
    pub logo_url: &'static str,
    pub minimum_supported_release: &'static str,
    pub categories: Vec<&'static str>,
    pub authors: Vec<&'static str>,
    pub auth: AuthSchema,
    pub actions: Vec<ActionDefinition>,
    pub triggers: Vec<TriggerDefinition>,
}

/// Static manifest of the piece
pub fn manifest() -> &'static PieceManifest {
    &MANIFEST
}

/// Piece instance shared by every run issued by a host
pub struct EasiwarePiece {
    http: Client,
    metrics: Arc<DispatchMetrics>,
    actions: Vec<Box<dyn Action>>,
    triggers: Vec<WebhookTrigger>,
}

impl EasiwarePiece {
    pub fn new(config: &HttpConfig) -> PieceResult<Self> {
        Ok(Self {
            http: EasiwareClient::build_http(config)?,
            metrics: Arc::new(DispatchMetrics::new()),
            actions: registered_actions(),
            triggers: registered_triggers(),
        })
    }

    /// Build a piece from validated configuration
    pub fn from_config(config: &PieceConfig) -> PieceResult<Self> {
        config.validate_all().map_err(PieceError::configuration)?;
        Self::new(&config.http)
    }

    pub fn manifest(&self) -> &'static PieceManifest {
        manifest()
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn action(&self, name: &str) -> PieceResult<&dyn Action> {
        self.actions
            .iter()
            .find(|action| action.name() == name)
            .map(|action| action.as_ref())
            .ok_or_else(|| PieceError::not_found(format!("Action '{}'", name)))
    }

    pub fn trigger(&self, name: &str) -> PieceResult<&WebhookTrigger> {
        self.triggers
            .iter()
            .find(|trigger| trigger.full_name() == name || trigger.short_name() == name)
            .ok_or_else(|| PieceError::not_found(format!("Trigger '{}'", name)))
    }

    /// Client bound to one credential pair, sharing this piece's pool and metrics
    pub fn client(&self, auth: &EasiwareAuth) -> EasiwareClient {
        EasiwareClient::with_http(self.http.clone(), auth.clone(), self.metrics.clone())
    }

    pub async fn validate_auth(&self, auth: &EasiwareAuth) -> AuthValidation {
        debug!(
            app_url = %auth.app_url,
            api_key = %StringUtils::mask_secret(&auth.api_key),
            "Validating Easiware credentials"
        );
        auth.validate(&self.http).await
    }

    pub async fn run_action(&self, name: &str, ctx: &ActionContext) -> PieceResult<ActionOutcome> {
        let action = self.action(name)?;
        let outcome = self.client(&ctx.auth).run_action(action, &ctx.props).await?;

        debug!(action = name, expected = outcome.is_expected(), "Easiware action finished");
        Ok(outcome)
    }

    pub async fn enable_trigger(&self, name: &str, ctx: &TriggerContext) -> PieceResult<Value> {
        let trigger = self.trigger(name)?;
        info!(trigger = %trigger.full_name(), "Enabling Easiware trigger");
        trigger.on_enable(&self.client(&ctx.auth), ctx).await
    }

    pub async fn disable_trigger(&self, name: &str, ctx: &TriggerContext) -> PieceResult<bool> {
        let trigger = self.trigger(name)?;
        info!(trigger = %trigger.full_name(), "Disabling Easiware trigger");
        trigger.on_disable(&self.client(&ctx.auth), ctx).await
    }

    pub fn run_trigger(&self, name: &str, delivery: &WebhookDelivery) -> PieceResult<Vec<Value>> {
        Ok(self.trigger(name)?.run(delivery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn piece() -> EasiwarePiece {
        EasiwarePiece::new(&HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_manifest_metadata() {
        let value = serde_json::to_value(manifest()).unwrap();
        assert_eq!(value["displayName"], json!("Easiware"));
        assert_eq!(value["description"], json!("Lovely customer support software"));
        assert_eq!(value["minimumSupportedRelease"], json!("0.36.1"));
        assert_eq!(value["categories"], json!(["CUSTOMER_SUPPORT"]));
        assert_eq!(value["authors"], json!(["stefapi"]));
        assert_eq!(value["actions"].as_array().unwrap().len(), 23);
        assert_eq!(value["triggers"].as_array().unwrap().len(), 3);
        assert_eq!(value["auth"]["props"][0]["name"], json!("appUrl"));
    }

    #[test]
    fn test_lookup_by_name() {
        let piece = piece();
        assert!(piece.action("create_ticket").is_ok());
        assert!(piece.trigger("easiware_trigger_ticket_created").is_ok());

        match piece.action("search_tickets") {
            Err(PieceError::NotFound { resource }) => {
                assert_eq!(resource, "Action 'search_tickets'")
            }
            other => panic!("unexpected lookup result: {:?}", other.map(|a| a.name())),
        }
        assert!(piece.trigger("easiware_trigger_unknown").is_err());
    }

    #[test]
    fn test_run_trigger_returns_single_event() {
        let payload = json!({"class": "contact", "id": "c-1"});
        let events = piece()
            .run_trigger("contact_created", &WebhookDelivery::new(payload.clone()))
            .unwrap();
        assert_eq!(events, vec![payload]);
    }

    #[test]
    fn test_from_config_rejects_invalid_settings() {
        let config = PieceConfig::default();
        assert!(matches!(
            EasiwarePiece::from_config(&config),
            Err(PieceError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_action_validates_before_sending() {
        let piece = piece();
        let ctx = ActionContext::new(
            EasiwareAuth::new("http://127.0.0.1:1", "key"),
            json!({}).as_object().cloned().unwrap(),
        );

        let error = piece.run_action("get_ticket_from_id", &ctx).await.unwrap_err();
        assert!(matches!(error, PieceError::Validation { .. }));
        assert!(piece.metrics().snapshot().operations.is_empty());
    }
}
