//! Webhook triggers exposed by the piece

pub mod register;
pub mod store;

pub use register::{
    EventTypeSource, TriggerContext, TriggerDefinition, TriggerState, TriggerStrategy,
    WebhookTrigger,
};
pub use store::{MemoryStore, TriggerStore};

use serde_json::{json, Value};

const TICKET_EVENT_TYPES: [(&str, &str); 13] = [
    ("create", "Ticket is Created"),
    ("note", "Note has changed"),
    ("subject", "Subject has changed"),
    ("status", "Status has changed"),
    ("category", "Category has changed"),
    ("priority", "priority has changed"),
    ("agent", "Agent has changed"),
    ("currentChannel", "Current channel has changed"),
    ("contact", "Ticket has changed"),
    ("message", "New message has arrived"),
    ("solicitation", "Solicitation was send"),
    ("delete", "Ticket was deleted"),
    ("restore", "Ticket as restored"),
];

fn sample_event(class: &str) -> Value {
    json!({
        "class": class,
        "id": "61b3549b-0d5a-4555-b918-a090c149f2ea",
        "eventType": "create",
        "eventId": "78d67def-8073-4eda-8a1f-b19b5100e8bf"
    })
}

/// Every trigger the piece exposes, in manifest order
pub fn registered_triggers() -> Vec<WebhookTrigger> {
    vec![
        WebhookTrigger::new(
            "ticket_created",
            "Ticket Created",
            "Triggered when a new ticket is created.",
            EventTypeSource::fixed("create"),
            "ticket",
            sample_event("ticket"),
        ),
        WebhookTrigger::new(
            "contact_created",
            "Contact Created",
            "Triggered when a new contact is created.",
            EventTypeSource::fixed("create"),
            "contact",
            sample_event("contact"),
        ),
        WebhookTrigger::new(
            "ticket_event",
            "Ticket Event",
            "Triggered when a new event is received for the ticket.",
            EventTypeSource::selectable("Select the Event Type", &TICKET_EVENT_TYPES),
            "ticket",
            sample_event("contact"),
        ),
    ]
}

/// Look a trigger up by its full name, or by its short name
pub fn find_trigger(name: &str) -> Option<WebhookTrigger> {
    registered_triggers()
        .into_iter()
        .find(|trigger| trigger.full_name() == name || trigger.short_name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_triggers() {
        let names: Vec<String> = registered_triggers().iter().map(|t| t.full_name()).collect();
        assert_eq!(
            names,
            vec![
                "easiware_trigger_ticket_created",
                "easiware_trigger_contact_created",
                "easiware_trigger_ticket_event",
            ]
        );
    }

    #[test]
    fn test_fixed_and_selectable_sources() {
        let contact = find_trigger("contact_created").unwrap();
        assert_eq!(contact.event_type(), &EventTypeSource::fixed("create"));
        assert_eq!(contact.category(), "contact");

        let event = find_trigger("easiware_trigger_ticket_event").unwrap();
        match event.event_type() {
            EventTypeSource::Selectable { label, options } => {
                assert_eq!(label, "Select the Event Type");
                assert_eq!(options.len(), 13);
                assert_eq!(options[0].value, "create");
                assert_eq!(options[0].label, "Ticket is Created");
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_trigger() {
        assert!(find_trigger("easiware_trigger_ticket_deleted").is_none());
    }
}
