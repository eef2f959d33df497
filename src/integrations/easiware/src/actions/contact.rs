//! Contact actions

use super::{body_from_props, query_from_props, Action, ActionDefinition, CUSTOM_FIELDS_VALUES};
use crate::error::PieceResult;
use crate::props::{options, DropdownOption, Property, PropsValue};
use crate::request::{ApiRequest, QueryParams};
use crate::utils::StringUtils;

fn civility_options() -> Vec<DropdownOption> {
    options(&[("Mr", "Mr"), ("Mrs", "Mrs")])
}

fn country_code() -> Property {
    Property::short_text("countryCode", "Country code")
        .with_description("The country code iso3166 alpha-2 exemple: FR")
}

pub struct GetContact;

impl Action for GetContact {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_contact_from_id",
            display_name: "Get a Contact",
            description: "Get contacts details from ID number.",
            props: vec![Property::short_text("contactid", "Contact ID number")
                .with_description("The ID number of the contact")
                .required()],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let id = props.require_text("contactid")?;
        Ok(ApiRequest::get(format!(
            "/v1/contacts/{}",
            StringUtils::path_segment(&id)
        )))
    }
}

pub struct SearchContact;

impl Action for SearchContact {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "search_contact",
            display_name: "Search a Contact",
            description: "Search contacts and get details.",
            props: vec![
                Property::short_text("cityName", "City Name").with_description("The name of city"),
                Property::static_dropdown("civility", "Civility", civility_options())
                    .with_description("Civility of the contact"),
                country_code(),
                Property::date_time("createdAfter", "Created after")
                    .with_description("Return contacts created after this date"),
                Property::date_time("createdBefore", "Created before")
                    .with_description("Return contacts created before this date"),
                Property::short_text("email", "Email Address")
                    .with_description("The email address of the contact"),
                Property::short_text("firstName", "First name")
                    .with_description("The first name of the contact"),
                Property::short_text("languageCode", "Language code").with_description(
                    "The language code of the contact iso3166 alpha-2 exemple: fr",
                ),
                Property::short_text("lastName", "Last name")
                    .with_description("The last name of the contact"),
                Property::short_text("phoneNumber", "Phone number").with_description(
                    "The phone number of the contact in E.164 standard. Example: +33723456789",
                ),
                Property::short_text("postalCode", "Postal code")
                    .with_description("The postal code of the contact"),
                Property::short_text("search", "global search")
                    .with_description("Use global search on contact with this text"),
                Property::date_time("updatedAfter", "Updated after")
                    .with_description("Return contacts updated after this date"),
                Property::date_time("updatedBefore", "Updated before")
                    .with_description("Return contacts updated before this date"),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::get("/v1/contacts").with_query(query_from_props(props)))
    }
}

/// Create fields, in body order
fn contact_fields() -> Vec<Property> {
    vec![
        Property::short_text("email", "Email address")
            .with_description("Unique email address of the contact")
            .required(),
        Property::short_text("firstName", "First name"),
        Property::short_text("lastName", "Last name"),
        Property::short_text("phoneNumber", "Phone number (E.164)"),
        Property::static_dropdown("civilStatus", "Civility", civility_options()),
        Property::short_text("birthday", "Birthday").with_description("YYYY-MM-DD"),
        Property::short_text("companyName", "Company name"),
        Property::short_text("streetName", "Street address"),
        Property::short_text("cityName", "City"),
        Property::short_text("stateName", "State / Region"),
        Property::short_text("zipCode", "Postal code"),
        country_code(),
        Property::short_text("languageCode", "Language code")
            .with_description("The Language code iso3166 alpha-2 exemple: fr"),
        Property::long_text("notes", "Notes"),
        Property::json(CUSTOM_FIELDS_VALUES, "Custom fields values (JSON)")
            .with_description("Match your custom fields schema"),
    ]
}

pub struct CreateContact;

impl Action for CreateContact {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "create_contact",
            display_name: "Create a Contact",
            description: "Create a new contact in Easiware.",
            props: contact_fields(),
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        Ok(ApiRequest::post("/v1/contacts").with_body(body_from_props(props, &[]).into_value()))
    }
}

pub struct UpdateContact;

impl UpdateContact {
    /// Same body keys as create, every one optional
    fn fields() -> Vec<Property> {
        vec![
            Property::short_text("email", "Email Address")
                .with_description("The contact's email address (must be unique)."),
            Property::short_text("firstName", "First name")
                .with_description("The contact's first name."),
            Property::short_text("lastName", "Last name")
                .with_description("The contact's last name."),
            Property::short_text("phoneNumber", "Phone number")
                .with_description("Phone in E.164 format, e.g. +33782453467"),
            Property::static_dropdown("civilStatus", "Civil Status", civility_options())
                .with_description("The contact's civil title"),
            Property::date_time("birthday", "Birthday")
                .with_description("The contact's birth date (YYYY-MM-DD)"),
            Property::short_text("companyName", "Company name")
                .with_description("The contact's company name"),
            Property::short_text("streetName", "Street address")
                .with_description("The contact's street address"),
            Property::short_text("cityName", "City name").with_description("The contact's city"),
            Property::short_text("stateName", "State / Region")
                .with_description("Province or region"),
            Property::short_text("zipCode", "Postal code")
                .with_description("The contact's postal code"),
            country_code(),
            Property::short_text("languageCode", "Language code")
                .with_description("The language code iso3166 alpha-2 exemple: fr"),
            Property::short_text("notes", "Notes")
                .with_description("Additional information about the contact"),
            Property::json(CUSTOM_FIELDS_VALUES, "Custom fields values").with_description(
                "JSON object containing custom fields (must match fields defined in your solution).",
            ),
        ]
    }
}

impl Action for UpdateContact {
    fn definition(&self) -> ActionDefinition {
        let mut props = vec![Property::short_text("id", "Contact ID")
            .with_description("easiware internal identifier for the contact to update")
            .required()];
        props.extend(Self::fields());

        ActionDefinition {
            name: "update_contact",
            display_name: "Update a Contact",
            description: "Update an existing contact by ID.",
            props,
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let id = props.require_text("id")?;
        Ok(ApiRequest::patch(format!("/v1/contacts/{}", StringUtils::path_segment(&id)))
            .with_body(body_from_props(props, &["id"]).into_value()))
    }
}

pub struct ListContactCustomFields;

impl Action for ListContactCustomFields {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "list_contact_custom_fields",
            display_name: "List Contact Custom Fields",
            description: "Retrieve the list of custom field definitions for contacts.",
            props: vec![Property::short_text("search", "Search Text")
                .with_description("Search string to filter custom fields.")],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let mut query = QueryParams::new();
        if let Some(search) = props.text("search") {
            let search = search.trim();
            if !search.is_empty() {
                query.push("search", search);
            }
        }
        Ok(ApiRequest::get("/v1/contact-custom-fields").with_query(query))
    }
}

pub struct GetContactCustomFieldChoices;

impl Action for GetContactCustomFieldChoices {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "get_contact_custom_field_choices",
            display_name: "Get Contact Custom Field Choices",
            description: "Retrieve available choices for the specified contact custom field.",
            props: vec![Property::short_text("customId", "Custom Field ID")
                .with_description("The customId of the contact custom field.")
                .required()],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let custom_id = props.require_text("customId")?;
        Ok(ApiRequest::get(format!(
            "/v1/contact-custom-fields/{}/choices",
            StringUtils::path_segment(&custom_id)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawProps;
    use crate::props::PropertyKind;
    use pretty_assertions::assert_eq;
    use reqwest::{Method, StatusCode};
    use serde_json::{json, Value};

    fn build(action: &dyn Action, raw: Value) -> PieceResult<ApiRequest> {
        let raw: RawProps = raw.as_object().cloned().unwrap();
        let props = PropsValue::resolve(&action.definition().props, &raw)?;
        action.build(&props)
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_contact() {
        let request = build(&GetContact, json!({"contactid": "c-42"})).unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v1/contacts/c-42");
        assert!(request.query.is_empty());
        assert!(request.body.is_none());
        assert_eq!(request.expected_status, Some(StatusCode::OK));
    }

    #[test]
    fn test_get_contact_requires_id() {
        assert!(build(&GetContact, json!({})).is_err());
        assert!(build(&GetContact, json!({"contactid": ""})).is_err());
    }

    #[test]
    fn test_search_contact_sends_only_present_props() {
        let request = build(
            &SearchContact,
            json!({
                "search": "dupont",
                "email": "",
                "civility": "Mrs",
                "firstName": null,
                "createdAfter": "2024-01-01T00:00:00Z"
            }),
        )
        .unwrap();

        assert_eq!(request.path, "/v1/contacts");
        assert_eq!(
            request.query,
            pairs(&[
                ("civility", "Mrs"),
                ("createdAfter", "2024-01-01T00:00:00Z"),
                ("search", "dupont"),
            ])
        );
    }

    #[test]
    fn test_search_contact_without_props() {
        let request = build(&SearchContact, json!({})).unwrap();
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_create_contact_body() {
        let request = build(
            &CreateContact,
            json!({
                "email": "jane@example.com",
                "lastName": "Doe",
                "firstName": "Jane",
                "notes": "",
                "customFieldsValues": {"vip": true}
            }),
        )
        .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v1/contacts");
        assert_eq!(request.expected_status, Some(StatusCode::CREATED));
        assert_eq!(
            serde_json::to_string(request.body.as_ref().unwrap()).unwrap(),
            r#"{"email":"jane@example.com","firstName":"Jane","lastName":"Doe","customFieldsValues":{"vip":true}}"#
        );
    }

    #[test]
    fn test_create_contact_omits_empty_custom_fields() {
        let request = build(
            &CreateContact,
            json!({"email": "jane@example.com", "customFieldsValues": {}}),
        )
        .unwrap();
        assert_eq!(request.body, Some(json!({"email": "jane@example.com"})));
    }

    #[test]
    fn test_create_contact_rejects_unknown_civility() {
        let result = build(
            &CreateContact,
            json!({"email": "jane@example.com", "civilStatus": "Dr"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_contact_excludes_id_from_body() {
        let request = build(
            &UpdateContact,
            json!({"id": "c-7", "phoneNumber": "+33723456789", "email": null}),
        )
        .unwrap();

        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "/v1/contacts/c-7");
        assert_eq!(request.expected_status, Some(StatusCode::OK));
        assert_eq!(request.body, Some(json!({"phoneNumber": "+33723456789"})));
    }

    #[test]
    fn test_update_contact_schema() {
        let props = UpdateContact.definition().props;
        let create = CreateContact.definition().props;

        let names: Vec<&str> = props.iter().skip(1).map(|p| p.name.as_str()).collect();
        let create_names: Vec<&str> = create.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, create_names);
        assert!(props.iter().skip(1).all(|p| !p.required));

        let kind = |name: &str| {
            props
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.kind.clone())
                .unwrap()
        };
        assert_eq!(kind("birthday"), PropertyKind::DateTime);
        assert_eq!(kind("notes"), PropertyKind::ShortText);
    }

    #[test]
    fn test_update_contact_with_only_id_sends_empty_body() {
        let request = build(&UpdateContact, json!({"id": "c-7"})).unwrap();
        assert_eq!(request.body, Some(json!({})));
    }

    #[test]
    fn test_list_contact_custom_fields_trims_search() {
        let request = build(&ListContactCustomFields, json!({"search": "  size "})).unwrap();
        assert_eq!(request.path, "/v1/contact-custom-fields");
        assert_eq!(request.query, pairs(&[("search", "size")]));

        let blank = build(&ListContactCustomFields, json!({"search": "   "})).unwrap();
        assert!(blank.query.is_empty());
    }

    #[test]
    fn test_get_contact_custom_field_choices() {
        let request =
            build(&GetContactCustomFieldChoices, json!({"customId": "shoe_size"})).unwrap();
        assert_eq!(request.path, "/v1/contact-custom-fields/shoe_size/choices");
    }
}
