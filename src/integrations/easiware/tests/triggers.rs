//! Webhook trigger lifecycle against a mock Easiware API

mod common;

use common::{auth_for, bearer, piece, raw};
use easiware_integration::{
    find_trigger, MemoryStore, PieceError, TriggerContext, TriggerState, TriggerStore,
    WebhookDelivery,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tracing_test::traced_test;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEBHOOK_URL: &str = "https://host.test/webhooks/flow-1";

fn context(
    server: &MockServer,
    props: serde_json::Value,
    store: Arc<MemoryStore>,
) -> TriggerContext {
    TriggerContext::new(auth_for(server), raw(props), WEBHOOK_URL, store)
}

#[tokio::test]
#[traced_test]
async fn enable_subscribes_and_stores_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .and(header("Authorization", bearer().as_str()))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "url": WEBHOOK_URL,
            "eventType": "create",
            "category": "ticket"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "wh-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let ctx = context(&server, json!({}), store.clone());

    let subscription = piece()
        .enable_trigger("easiware_trigger_ticket_created", &ctx)
        .await
        .unwrap();

    assert_eq!(subscription, json!({"data": {"id": "wh-1"}}));
    assert_eq!(
        store.get("easiware_ticket_created_trigger").await.unwrap(),
        Some(json!({"data": {"id": "wh-1"}}))
    );
    assert!(logs_contain("Easiware webhook subscribed"));
}

#[tokio::test]
async fn selectable_trigger_sends_chosen_event_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .and(body_json(json!({
            "url": WEBHOOK_URL,
            "eventType": "message",
            "category": "ticket"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "wh-2"}})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let ctx = context(&server, json!({"eventType": "message"}), store.clone());

    piece().enable_trigger("ticket_event", &ctx).await.unwrap();

    let trigger = find_trigger("ticket_event").unwrap();
    assert_eq!(
        trigger.state(store.as_ref()).await.unwrap(),
        TriggerState::Enabled {
            subscription: json!({"data": {"id": "wh-2"}})
        }
    );
}

#[tokio::test]
async fn selectable_trigger_without_choice_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let ctx = context(&server, json!({}), store.clone());

    let error = piece().enable_trigger("ticket_event", &ctx).await.unwrap_err();
    assert!(matches!(error, PieceError::Validation { .. }));
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_subscription_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let ctx = context(&server, json!({}), store.clone());

    let error = piece().enable_trigger("contact_created", &ctx).await.unwrap_err();
    match error {
        PieceError::ExternalApi { status_code, .. } => assert_eq!(status_code, 500),
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn disable_detaches_stored_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks/wh-1/detach"))
        .and(header("Authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "wh-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .put("easiware_contact_created_trigger", json!({"data": {"id": "wh-1"}}))
        .await
        .unwrap();
    let ctx = context(&server, json!({}), store.clone());

    let detached = piece()
        .disable_trigger("easiware_trigger_contact_created", &ctx)
        .await
        .unwrap();

    assert!(detached);
    assert!(store.is_empty());
}

#[tokio::test]
async fn disable_without_subscription_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let ctx = context(&server, json!({}), store.clone());

    let detached = piece().disable_trigger("ticket_created", &ctx).await.unwrap();
    assert!(!detached);

    store
        .put("easiware_ticket_created_trigger", json!({"data": {}}))
        .await
        .unwrap();
    let detached = piece().disable_trigger("ticket_created", &ctx).await.unwrap();
    assert!(!detached);
}

#[tokio::test]
async fn failed_detach_keeps_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/webhooks/wh-9/detach"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .put("easiware_ticket_event_trigger", json!({"data": {"id": "wh-9"}}))
        .await
        .unwrap();
    let ctx = context(&server, json!({"eventType": "note"}), store.clone());

    let error = piece().disable_trigger("ticket_event", &ctx).await.unwrap_err();
    assert_eq!(error.error_code(), "EXTERNAL_API_ERROR");
    assert_eq!(store.len(), 1);
}

#[test]
fn delivery_is_forwarded_unchanged() {
    let payload = json!({
        "class": "ticket",
        "id": "61b3549b-0d5a-4555-b918-a090c149f2ea",
        "eventType": "create",
        "eventId": "78d67def-8073-4eda-8a1f-b19b5100e8bf"
    });

    let events = piece()
        .run_trigger("ticket_created", &WebhookDelivery::new(payload.clone()))
        .unwrap();
    assert_eq!(events, vec![payload]);
}
