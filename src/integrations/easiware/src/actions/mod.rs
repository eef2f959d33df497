//! Action catalogue
//!
//! Each action maps a fixed property schema to exactly one request. Builders
//! are pure: they receive the resolved [`PropsValue`] and return an
//! [`ApiRequest`]; [`crate::client::EasiwareClient`] does the rest.

pub mod contact;
pub mod custom_api;
pub mod misc;
pub mod ticket;

use crate::auth::EasiwareAuth;
use crate::error::PieceResult;
use crate::models::RawProps;
use crate::props::{Property, PropsValue};
use crate::request::{ApiRequest, JsonBody, QueryParams};
use crate::utils::JsonUtils;
use serde::Serialize;
use serde_json::Value;

pub(crate) const CUSTOM_FIELDS_VALUES: &str = "customFieldsValues";

/// What the host renders for one action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub props: Vec<Property>,
}

/// A single-request operation against the Easiware API
pub trait Action: Send + Sync {
    fn definition(&self) -> ActionDefinition;

    /// Build the outgoing request from resolved props
    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest>;

    fn name(&self) -> &'static str {
        self.definition().name
    }
}

/// Run context handed to an action by the host
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub auth: EasiwareAuth,
    pub props: RawProps,
}

impl ActionContext {
    pub fn new(auth: EasiwareAuth, props: RawProps) -> Self {
        Self { auth, props }
    }
}

/// Every action the piece exposes, in manifest order
pub fn registered_actions() -> Vec<Box<dyn Action>> {
    vec![
        Box::new(contact::GetContact),
        Box::new(contact::SearchContact),
        Box::new(contact::CreateContact),
        Box::new(contact::UpdateContact),
        Box::new(contact::ListContactCustomFields),
        Box::new(contact::GetContactCustomFieldChoices),
        Box::new(misc::GetApiStatus),
        Box::new(misc::GetAuthInfo),
        Box::new(misc::SearchCategories),
        Box::new(misc::GetCategory),
        Box::new(misc::SearchUsers),
        Box::new(misc::GetUser),
        Box::new(ticket::GetTicket),
        Box::new(ticket::CreateTicket),
        Box::new(ticket::UpdateTicket),
        Box::new(ticket::GetTicketMessages),
        Box::new(ticket::AddTicketMessage),
        Box::new(ticket::SearchTicketEvents),
        Box::new(ticket::GetTicketEvent),
        Box::new(ticket::ListTicketCustomFields),
        Box::new(ticket::GetTicketCustomFieldChoices),
        Box::new(ticket::FindTicketsByBody),
        Box::new(custom_api::CustomApiCall),
    ]
}

pub fn find_action(name: &str) -> Option<Box<dyn Action>> {
    registered_actions()
        .into_iter()
        .find(|action| action.name() == name)
}

/// Every present prop as a stringified query pair, in declaration order
pub(crate) fn query_from_props(props: &PropsValue) -> QueryParams {
    let mut query = QueryParams::new();
    for (name, value) in props.iter() {
        query.push(name.as_str(), JsonUtils::to_query_value(value));
    }
    query
}

/// Every present prop as a body field, skipping `exclude`; custom fields only
/// when they hold at least one key
pub(crate) fn body_from_props(props: &PropsValue, exclude: &[&str]) -> JsonBody {
    let mut body = JsonBody::new();
    for (name, value) in props.iter() {
        if exclude.contains(&name.as_str()) {
            continue;
        }
        if name == CUSTOM_FIELDS_VALUES {
            if let Some(fields) = props.object(CUSTOM_FIELDS_VALUES) {
                body.insert(name.as_str(), Value::Object(fields.clone()));
            }
            continue;
        }
        body.insert(name.as_str(), value.clone());
    }
    body
}
