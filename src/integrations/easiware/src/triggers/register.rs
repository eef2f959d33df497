//! Webhook trigger registrar
//!
//! One factory covers every Easiware trigger. Enabling subscribes the host's
//! webhook URL for an event type and category and keeps the returned
//! subscription in the trigger store; disabling detaches it again. Inbound
//! deliveries are forwarded untouched.

use super::store::TriggerStore;
use crate::auth::EasiwareAuth;
use crate::client::EasiwareClient;
use crate::error::{PieceError, PieceResult};
use crate::models::{ApiResponse, RawProps, WebhookDelivery};
use crate::props::{DropdownOption, Property, PropsValue};
use crate::request::{ApiRequest, JsonBody};
use crate::utils::{JsonUtils, StringUtils};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const EVENT_TYPE_PROP: &str = "eventType";

/// Where a trigger's event type comes from
#[derive(Debug, Clone, PartialEq)]
pub enum EventTypeSource {
    /// Baked into the trigger definition
    Fixed(String),
    /// Picked by the user from a required dropdown
    Selectable {
        label: String,
        options: Vec<DropdownOption>,
    },
}

impl EventTypeSource {
    pub fn fixed<S: Into<String>>(event_type: S) -> Self {
        Self::Fixed(event_type.into())
    }

    /// Dropdown built from `(value, label)` pairs
    pub fn selectable<S: Into<String>>(label: S, choices: &[(&str, &str)]) -> Self {
        Self::Selectable {
            label: label.into(),
            options: choices
                .iter()
                .map(|(value, label)| DropdownOption::new(*label, *value))
                .collect(),
        }
    }

    pub fn props(&self) -> Vec<Property> {
        match self {
            Self::Fixed(_) => Vec::new(),
            Self::Selectable { label, options } => vec![Property::static_dropdown(
                EVENT_TYPE_PROP,
                label.clone(),
                options.clone(),
            )
            .with_description("Choose the event type to listen for")
            .required()],
        }
    }

    /// Event type to subscribe to
    pub fn resolve(&self, props: &PropsValue) -> PieceResult<String> {
        match self {
            Self::Fixed(event_type) => Ok(event_type.clone()),
            Self::Selectable { .. } => props.require_text(EVENT_TYPE_PROP),
        }
    }
}

/// How the host feeds the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerStrategy {
    Webhook,
}

/// What the host renders for one trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDefinition {
    pub name: String,
    pub display_name: &'static str,
    pub description: &'static str,
    pub props: Vec<Property>,
    pub sample_data: Value,
    #[serde(rename = "type")]
    pub strategy: TriggerStrategy,
}

/// Run context handed to a trigger by the host
#[derive(Clone)]
pub struct TriggerContext {
    pub auth: EasiwareAuth,
    pub props: RawProps,
    pub webhook_url: String,
    pub store: Arc<dyn TriggerStore>,
}

impl TriggerContext {
    pub fn new<U: Into<String>>(
        auth: EasiwareAuth,
        props: RawProps,
        webhook_url: U,
        store: Arc<dyn TriggerStore>,
    ) -> Self {
        Self {
            auth,
            props,
            webhook_url: webhook_url.into(),
            store,
        }
    }
}

impl std::fmt::Debug for TriggerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerContext")
            .field("auth", &self.auth)
            .field("props", &self.props)
            .field("webhook_url", &self.webhook_url)
            .finish_non_exhaustive()
    }
}

/// Lifecycle state as seen through the trigger store
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerState {
    Disabled,
    Enabled { subscription: Value },
}

/// A webhook-backed trigger
#[derive(Debug, Clone)]
pub struct WebhookTrigger {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    event_type: EventTypeSource,
    category: &'static str,
    sample_data: Value,
}

impl WebhookTrigger {
    pub fn new(
        name: &'static str,
        display_name: &'static str,
        description: &'static str,
        event_type: EventTypeSource,
        category: &'static str,
        sample_data: Value,
    ) -> Self {
        Self {
            name,
            display_name,
            description,
            event_type,
            category,
            sample_data,
        }
    }

    /// Name the host knows the trigger by
    pub fn full_name(&self) -> String {
        format!("easiware_trigger_{}", self.name)
    }

    pub fn short_name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn event_type(&self) -> &EventTypeSource {
        &self.event_type
    }

    /// Store key holding the remote subscription
    pub fn store_key(&self) -> String {
        format!("easiware_{}_trigger", self.name)
    }

    pub fn definition(&self) -> TriggerDefinition {
        TriggerDefinition {
            name: self.full_name(),
            display_name: self.display_name,
            description: self.description,
            props: self.event_type.props(),
            sample_data: self.sample_data.clone(),
            strategy: TriggerStrategy::Webhook,
        }
    }

    pub fn subscribe_request(
        &self,
        props: &PropsValue,
        webhook_url: &str,
    ) -> PieceResult<ApiRequest> {
        let mut body = JsonBody::new();
        body.insert("url", Value::from(webhook_url));
        body.insert("eventType", Value::from(self.event_type.resolve(props)?));
        body.insert("category", Value::from(self.category));

        Ok(ApiRequest::post("/v1/webhooks")
            .expect_any_status()
            .with_body(body.into_value()))
    }

    pub fn detach_request(handle: &str) -> ApiRequest {
        ApiRequest::post(format!(
            "/v1/webhooks/{}/detach",
            StringUtils::path_segment(handle)
        ))
        .expect_any_status()
    }

    /// Subscription handle of a stored subscription, read at `data.id`
    pub fn subscription_handle(subscription: &Value) -> Option<String> {
        subscription
            .pointer("/data/id")
            .filter(|id| JsonUtils::is_present(id))
            .map(JsonUtils::to_query_value)
    }

    pub async fn state(&self, store: &dyn TriggerStore) -> PieceResult<TriggerState> {
        Ok(match store.get(&self.store_key()).await? {
            Some(subscription) => TriggerState::Enabled { subscription },
            None => TriggerState::Disabled,
        })
    }

    /// Subscribe the webhook URL and remember the subscription
    pub async fn on_enable(
        &self,
        client: &EasiwareClient,
        ctx: &TriggerContext,
    ) -> PieceResult<Value> {
        let props = PropsValue::resolve(&self.event_type.props(), &ctx.props)?;
        let request = self.subscribe_request(&props, &ctx.webhook_url)?;

        let response = client
            .send(&format!("{}:enable", self.full_name()), &request)
            .await?;
        ensure_success(&response, "Webhook subscription failed")?;

        ctx.store.put(&self.store_key(), response.body.clone()).await?;
        info!(
            trigger = %self.full_name(),
            category = self.category,
            status = response.status,
            "Easiware webhook subscribed"
        );

        Ok(response.body)
    }

    /// Detach the stored subscription. Returns whether a detach call was made.
    pub async fn on_disable(
        &self,
        client: &EasiwareClient,
        ctx: &TriggerContext,
    ) -> PieceResult<bool> {
        let key = self.store_key();
        let handle = ctx
            .store
            .get(&key)
            .await?
            .as_ref()
            .and_then(Self::subscription_handle);

        let Some(handle) = handle else {
            debug!(trigger = %self.full_name(), "No Easiware webhook to detach");
            return Ok(false);
        };

        let response = client
            .send(&format!("{}:disable", self.full_name()), &Self::detach_request(&handle))
            .await?;
        ensure_success(&response, "Webhook detach failed")?;

        ctx.store.delete(&key).await?;
        info!(trigger = %self.full_name(), handle = %handle, "Easiware webhook detached");

        Ok(true)
    }

    /// Forward an inbound delivery as a single event
    pub fn run(&self, delivery: &WebhookDelivery) -> Vec<Value> {
        vec![delivery.body.clone()]
    }
}

fn ensure_success(response: &ApiResponse, message: &str) -> PieceResult<()> {
    if response.is_success() {
        return Ok(());
    }

    warn!(status = response.status, body = %response.body, "{}", message);
    Err(PieceError::external_api(
        "easiware",
        response.status,
        format!("{}: {}", message, response.body),
    ))
}
