//! # Easiware Integration Piece
//!
//! Exposes the Easiware customer-support REST API (contacts, tickets,
//! categories, users, ticket events and custom fields) as workflow actions,
//! and Easiware webhooks as workflow triggers.
//!
//! ## Features
//!
//! - **Actions**: one typed property schema and one HTTP request per action;
//!   unset properties never reach the wire
//! - **Triggers**: webhook subscription on enable, detach on disable, payload
//!   pass-through on delivery
//! - **Credentials**: API URL plus API key, validated with a single probe
//! - **Observability**: structured `tracing` events and per-action dispatch metrics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use easiware_integration::{ActionContext, EasiwareAuth, EasiwarePiece, PieceConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PieceConfig::from_env()?;
//!     let piece = EasiwarePiece::from_config(&config)?;
//!
//!     let auth = EasiwareAuth::new("https://api.easiware.com", "api-key");
//!     let props = json!({"source": "email", "subject": "Parcel lost"});
//!     let ctx = ActionContext::new(auth, props.as_object().cloned().unwrap_or_default());
//!
//!     let outcome = piece.run_action("create_ticket", &ctx).await?;
//!     println!("{}", outcome.into_value());
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod piece;
pub mod props;
pub mod request;
pub mod telemetry;
pub mod triggers;
pub mod utils;

// Re-export main types for easier usage
pub use actions::{find_action, registered_actions, Action, ActionContext, ActionDefinition};
pub use auth::{AuthSchema, EasiwareAuth};
pub use client::EasiwareClient;
pub use config::{AuthConfig, HttpConfig, ObservabilityConfig, PieceConfig};
pub use error::{PieceError, PieceResult};
pub use metrics::{DispatchMetrics, DispatchResult, MetricsSnapshot, OperationStats};
pub use models::{ActionOutcome, ApiResponse, AuthValidation, RawProps, WebhookDelivery};
pub use piece::{manifest, EasiwarePiece, PieceManifest};
pub use props::{DropdownOption, Property, PropertyKind, PropsValue};
pub use request::{ApiRequest, JsonBody, QueryParams};
pub use triggers::{
    find_trigger, registered_triggers, EventTypeSource, MemoryStore, TriggerContext,
    TriggerDefinition, TriggerState, TriggerStore, WebhookTrigger,
};

/// Version information for the piece
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PIECE_NAME: &str = "easiware";
