//! Ticket actions
//!
//! Tickets carry the richest filters of the API. Identifier lists are typed
//! as comma-separated text and sent either as repeated query parameters
//! ([`SearchTickets`]) or as arrays in a JSON body ([`FindTicketsByBody`]).

use super::{body_from_props, Action, ActionDefinition, CUSTOM_FIELDS_VALUES};
use crate::error::PieceResult;
use crate::props::{options, DropdownOption, Property, PropsValue};
use crate::request::{ApiRequest, JsonBody, QueryParams};
use crate::utils::StringUtils;
use serde_json::{json, Value};

const DATE_FILTERS: [&str; 4] = ["createdAfter", "createdBefore", "updatedAfter", "updatedBefore"];

fn status_options() -> Vec<DropdownOption> {
    options(&[
        ("New", "new"),
        ("In progress", "in_progress"),
        ("Waiting", "waiting"),
        ("Closed", "closed"),
    ])
}

fn priority_options() -> Vec<DropdownOption> {
    options(&[("Low", "low"), ("Medium", "medium"), ("High", "high")])
}

fn source_options() -> Vec<DropdownOption> {
    options(&[
        ("Chat", "chat"),
        ("Email", "email"),
        ("Phone", "phone"),
        ("Webform", "webform"),
    ])
}

/// Ticket event types, labelled with their own value
fn event_type_options() -> Vec<DropdownOption> {
    [
        "create",
        "note",
        "subject",
        "status",
        "category",
        "priority",
        "agent",
        "currentChannel",
        "contact",
        "message",
        "solicitation",
        "delete",
        "restore",
    ]
    .iter()
    .map(|value| DropdownOption::new(*value, *value))
    .collect()
}

fn ticket_id(description: &str) -> Property {
    Property::short_text("ticketId", "Ticket ID")
        .with_description(description)
        .required()
}

fn date_filters() -> Vec<Property> {
    vec![
        Property::short_text("createdAfter", "Created after")
            .with_description("ISO-8601 date-time (e.g. 2025-01-01T00:00:00Z)."),
        Property::short_text("createdBefore", "Created before")
            .with_description("ISO-8601 date-time."),
        Property::short_text("updatedAfter", "Updated after")
            .with_description("ISO-8601 date-time."),
        Property::short_text("updatedBefore", "Updated before")
            .with_description("ISO-8601 date-time."),
    ]
}

pub struct GetTicket;

impl Action for GetTicket {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_ticket_from_id",
            display_name: "Get a Ticket",
            description: "Retrieve a ticket by its ID.",
            props: vec![ticket_id("The ID number of the ticket")],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get(format!(
            "/v1/tickets/{}",
            StringUtils::path_segment(&props.require_text("ticketId")?)
        )))
    }
}

/// Query-string ticket search. Superseded by [`FindTicketsByBody`] in the
/// manifest but still usable directly.
pub struct SearchTickets;

impl Action for SearchTickets {
    fn definition(&self) -> ActionDefinition {
        let mut props = vec![
            Property::short_text("search", "Free text")
                .with_description("Full-text search on subject, messages and contact fields."),
            Property::short_text("contactId", "Contact IDs")
                .with_description("Comma-separated list of contact IDs."),
            Property::short_text("agentId", "Agent IDs")
                .with_description("Comma-separated list of agent IDs."),
            Property::short_text("categoryId", "Category IDs")
                .with_description("Comma-separated list of category IDs."),
            Property::short_text("originalRecipientEmailAddress", "Original recipient emails")
                .with_description("Filter email tickets by the original \"To:\" address."),
            Property::static_multi_select("status", "Status", status_options())
                .with_description("Ticket status: new, in_progress, waiting, closed."),
            Property::static_multi_select("priority", "Priority", priority_options())
                .with_description("Ticket priority: low, medium, high."),
            Property::static_multi_select("source", "Source", source_options())
                .with_description("Channel that created the ticket."),
            Property::static_dropdown(
                "deleted",
                "Include deleted tickets",
                options(&[("False (default)", "false"), ("True", "true")]),
            )
            .with_description("true = include soft-deleted tickets."),
            Property::static_dropdown(
                "unassigned",
                "Only unassigned",
                options(&[("False (default)", "false"), ("True", "true")]),
            )
            .with_description("true = tickets with no agent assigned."),
        ];
        props.extend(date_filters());
        props.push(
            Property::json(CUSTOM_FIELDS_VALUES, "Custom fields (JSON)")
                .with_description(
                    "Key-value filters on custom ticket fields (must exist beforehand).",
                )
                .with_default(json!({})),
        );

        ActionDefinition {
            name: "search_tickets",
            display_name: "Search Tickets",
            description: "Search your organization's tickets with all available filters.",
            props,
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let mut query = QueryParams::new();

        query.push_opt("search", props.text("search"));
        for key in ["contactId", "agentId", "categoryId", "originalRecipientEmailAddress"] {
            query.push_all(key, props.csv(key));
        }
        for key in ["status", "priority", "source"] {
            query.push_all(key, props.selections(key));
        }
        query.push_opt("deleted", props.text("deleted"));
        query.push_opt("unassigned", props.text("unassigned"));
        for key in DATE_FILTERS {
            query.push_opt(key, props.text(key));
        }
        if let Some(fields) = props.object(CUSTOM_FIELDS_VALUES) {
            query.push(
                CUSTOM_FIELDS_VALUES,
                serde_json::to_string(&Value::Object(fields.clone()))?,
            );
        }

        Ok(ApiRequest::get("/v1/tickets").with_query(query))
    }
}

pub struct CreateTicket;

impl Action for CreateTicket {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "create_ticket",
            display_name: "Create Ticket",
            description: "Create a new ticket in easiware.",
            props: vec![
                Property::static_dropdown("source", "Source*", source_options())
                    .with_description("Channel that originated the ticket.")
                    .required(),
                Property::short_text("subject", "Subject")
                    .with_description("Ticket title or subject line."),
                Property::static_dropdown("status", "Status", status_options())
                    .with_description("Initial workflow status of the ticket."),
                Property::static_dropdown("priority", "Priority", priority_options())
                    .with_description("Initial importance level of the ticket."),
                Property::short_text("contactId", "Contact ID")
                    .with_description("Identifier of the contact linked to the ticket."),
                Property::short_text("agentId", "Agent ID")
                    .with_description("Identifier of the agent assigned to the ticket (optional)."),
                Property::short_text("categoryId", "Category ID")
                    .with_description("Identifier of the category assigned to the ticket."),
                Property::short_text("originalRecipientEmailAddress", "Original recipient (email)")
                    .with_description("Original \"To\" address when the source is Email."),
                Property::json(CUSTOM_FIELDS_VALUES, "Custom fields (JSON)")
                    .with_description(
                        "Key-value map of custom field values. The fields must exist in easiware beforehand.",
                    )
                    .with_default(json!({})),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        // source is required, so it always opens the body
        Ok(ApiRequest::post("/v1/tickets").with_body(body_from_props(props, &[]).into_value()))
    }
}

pub struct UpdateTicket;

impl Action for UpdateTicket {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "update_ticket",
            display_name: "Update Ticket",
            description: "Partially update an existing ticket.",
            props: vec![
                ticket_id("Unique identifier of the ticket to update."),
                Property::short_text("subject", "Subject").with_description(
                    "New subject of the ticket (leave empty to keep current one).",
                ),
                Property::static_dropdown("status", "Status", status_options())
                    .with_description("Lifecycle status to set for the ticket."),
                Property::static_dropdown("priority", "Priority", priority_options())
                    .with_description("Priority level to apply."),
                Property::short_text("contactId", "Contact ID")
                    .with_description("Identifier of the contact linked to the ticket."),
                Property::short_text("categoryId", "Category ID").with_description(
                    "Identifier of the category (folder) in which the ticket is filed.",
                ),
                Property::json(CUSTOM_FIELDS_VALUES, "Custom fields (JSON)")
                    .with_description(
                        "Key-value map of custom field identifiers and their new values.",
                    )
                    .with_default(json!({})),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let id = props.require_text("ticketId")?;
        Ok(ApiRequest::patch(format!("/v1/tickets/{}", StringUtils::path_segment(&id)))
            .with_body(body_from_props(props, &["ticketId"]).into_value()))
    }
}

pub struct GetTicketMessages;

impl Action for GetTicketMessages {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_ticket_messages",
            display_name: "Get Ticket Messages",
            description: "Retrieve every message (emails, chats, notes, etc.) that belongs to a ticket by its easiware ID.",
            props: vec![ticket_id(
                "The easiware internal identifier of the ticket whose message history you wish to fetch.",
            )],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get(format!(
            "/v1/tickets/{}/messages",
            StringUtils::path_segment(&props.require_text("ticketId")?)
        )))
    }
}

pub struct AddTicketMessage;

impl Action for AddTicketMessage {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "add_ticket_message",
            display_name: "Add Ticket Message",
            description: "Append a new message to the specified ticket.",
            props: vec![
                ticket_id(
                    "easiware internal identifier of the ticket that will receive the message.",
                ),
                Property::static_dropdown("source", "Source*", source_options())
                    .with_description("Channel used to send the message, required by the API.")
                    .required(),
                Property::short_text("subject", "Subject").with_description(
                    "Optional subject of the message (mostly for email-like channels).",
                ),
                Property::long_text("content", "Content (Plain-text)*")
                    .with_description("Plain-text body of the message.")
                    .required(),
                Property::long_text("contentHtml", "Content (HTML)").with_description(
                    "Rich-text/HTML version of the message. The API sanitises it to avoid XSS.",
                ),
                Property::short_text("agentId", "Agent ID").with_description(
                    "Identifier of the agent author. Leave empty to mark the message as coming from the ticket's contact.",
                ),
                Property::short_text(
                    "originalRecipientEmailAddress",
                    "Original recipient (Email channel)",
                )
                .with_description(
                        "The original \"To\" email address, useful when a ticket aggregates several aliases.",
                    ),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let id = props.require_text("ticketId")?;

        let mut body = JsonBody::new();
        body.insert("source", json!(props.require_text("source")?));
        body.insert("content", json!(props.require_text("content")?));
        for key in ["subject", "contentHtml", "agentId", "originalRecipientEmailAddress"] {
            body.insert_opt(key, props.get(key).cloned());
        }

        let path = format!("/v1/tickets/{}/messages", StringUtils::path_segment(&id));
        Ok(ApiRequest::post(path).with_body(body.into_value()))
    }
}

pub struct SearchTicketEvents;

impl Action for SearchTicketEvents {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "search_ticket_events",
            display_name: "Search Ticket Events",
            description: "Retrieve ticket-history events (creation, notes, status changes, messages, etc.)",
            props: vec![
                Property::short_text("createdAfter", "Created After (ISO-8601)").with_description(
                    "Return only events **strictly after** this date/time (ISO-8601), e.g. `2025-05-01T00:00:00Z`.",
                ),
                Property::short_text("createdBefore", "Created Before (ISO-8601)").with_description(
                    "Return only events **strictly before** this date/time (ISO-8601), e.g. `2025-05-31T23:59:59Z`.",
                ),
                Property::static_multi_select("type", "Event Type(s)", event_type_options())
                    .with_description(
                        "Filter on one or several event categories. If left empty, all types are returned.",
                    ),
                Property::short_text("ticketId", "Ticket ID").with_description(
                    "Restrict the search to a single ticket's timeline (easiware internal ticket identifier).",
                ),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let mut query = QueryParams::new();
        query.push_opt("createdAfter", props.text("createdAfter"));
        query.push_opt("createdBefore", props.text("createdBefore"));
        query.push_all("type", props.selections("type"));
        query.push_opt("ticketId", props.text("ticketId"));

        Ok(ApiRequest::get("/v1/ticket-events").with_query(query))
    }
}

pub struct GetTicketEvent;

impl Action for GetTicketEvent {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_ticket_event_from_id",
            display_name: "Get Ticket Event",
            description: "Retrieve a single ticket event using its easiware ID.",
            props: vec![
                Property::short_text("eventId", "Ticket Event ID")
                    .with_description(
                        "The easiware internal identifier of the ticket event (value of the **id** field).",
                    )
                    .required(),
                Property::checkbox("returnRawResponse", "Return raw HTTP response on error")
                    .with_description(
                        "When enabled, the full HTTP response object is returned if the request fails (status other than 200).",
                    )
                    .with_default(json!(false)),
            ],
        }
    }

    // returnRawResponse does not change the request; a mismatch always yields the full response
    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get(format!(
            "/v1/ticket-events/{}",
            StringUtils::path_segment(&props.require_text("eventId")?)
        )))
    }
}

pub struct ListTicketCustomFields;

impl Action for ListTicketCustomFields {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "list_ticket_custom_fields",
            display_name: "List Ticket Custom Fields",
            description: "Return the definitions of all custom fields configured for tickets.",
            props: vec![Property::short_text("search", "Search term")
                .with_description(
                    "Text to match in the custom-field **label** or **customId**. Minimum one character; use \"*\" to list every field.",
                )
                .with_default(json!("*"))
                .required()],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let mut query = QueryParams::new();
        query.push("search", props.require_text("search")?);
        Ok(ApiRequest::get("/v1/ticket-custom-fields").with_query(query))
    }
}

pub struct GetTicketCustomFieldChoices;

impl Action for GetTicketCustomFieldChoices {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_ticket_custom_field_choices",
            display_name: "Get Ticket Custom-Field Choices",
            description: "Return the list of choices defined for a ticket custom-field of type **one** or **multiple**.",
            props: vec![Property::short_text("customId", "Custom Field ID")
                .with_description(
                    "The `customId` of the ticket custom-field whose choices you want to retrieve.",
                )
                .required()],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get(format!(
            "/v1/ticket-custom-fields/{}/choices",
            StringUtils::path_segment(&props.require_text("customId")?)
        )))
    }
}

pub struct FindTicketsByBody;

impl Action for FindTicketsByBody {
    fn definition(&self) -> ActionDefinition {
        let mut props = vec![
            Property::short_text("search", "Free-text search").with_description(
                "Matches subject, contact names, email addresses, etc. Same behaviour as the \"search\" query parameter.",
            ),
            Property::checkbox("deleted", "Include deleted tickets")
                .with_description("When enabled, soft-deleted tickets are returned as well.")
                .with_default(json!(false)),
            Property::checkbox("unassigned", "Only unassigned tickets")
                .with_description("Return tickets that have no agent assigned (agentId is null).")
                .with_default(json!(false)),
            Property::short_text("contactIds", "Contact IDs")
                .with_description("Comma-separated list of contact identifiers."),
            Property::short_text("agentIds", "Agent IDs")
                .with_description("Comma-separated list of agent identifiers."),
            Property::short_text("categoryIds", "Category IDs")
                .with_description("Comma-separated list of category identifiers."),
            Property::long_text("originalRecipientEmailAddresses", "Original recipient addresses")
                .with_description(
                    "Comma-separated list of \"To:\" addresses (mainly useful for the email channel).",
                ),
            Property::static_multi_select("status", "Status", status_options()),
            Property::static_multi_select("priority", "Priority", priority_options()),
            Property::static_multi_select("source", "Source", source_options()),
        ];
        props.extend(date_filters());
        props.push(
            Property::json(CUSTOM_FIELDS_VALUES, "Custom fields values")
                .with_description(
                    "Key/value object for custom fields (must match the custom field definitions configured in easiware).",
                )
                .with_default(json!({})),
        );

        ActionDefinition {
            name: "find_tickets_body",
            display_name: "Find Tickets (POST body)",
            description: "Search your organisation's tickets using all available filters. The request is sent in the body, mirroring the parameters of GET /tickets.",
            props,
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let mut body = JsonBody::new();

        body.insert_opt("search", props.get("search").cloned());
        if props.flag("deleted") {
            body.insert("deleted", Value::Bool(true));
        }
        if props.flag("unassigned") {
            body.insert("unassigned", Value::Bool(true));
        }
        for key in ["status", "priority", "source"] {
            body.insert_list(key, props.selections(key));
        }
        for key in DATE_FILTERS {
            body.insert_opt(key, props.get(key).cloned());
        }
        if let Some(fields) = props.object(CUSTOM_FIELDS_VALUES) {
            body.insert(CUSTOM_FIELDS_VALUES, Value::Object(fields.clone()));
        }
        for (prop, field) in [
            ("contactIds", "contactId"),
            ("agentIds", "agentId"),
            ("categoryIds", "categoryId"),
            ("originalRecipientEmailAddresses", "originalRecipientEmailAddress"),
        ] {
            body.insert_list(field, props.csv(prop));
        }

        Ok(ApiRequest::post("/v1/tickets/find").with_body(body.into_value()))
    }
}
