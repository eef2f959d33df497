//! Raw call against any Easiware endpoint with the piece's credentials

use super::{Action, ActionDefinition};
use crate::error::{PieceError, PieceResult};
use crate::props::{options, Property, PropsValue};
use crate::request::{ApiRequest, QueryParams};
use crate::utils::JsonUtils;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;

pub struct CustomApiCall;

impl CustomApiCall {
    fn path(props: &PropsValue) -> PieceResult<String> {
        let url = props.require_text("url")?;
        let url = url.trim();
        if url.contains("://") {
            return Err(PieceError::validation(
                "url",
                "Expected a path relative to the API URL",
            ));
        }
        Ok(if url.starts_with('/') {
            url.to_string()
        } else {
            format!("/{}", url)
        })
    }

    fn method(props: &PropsValue) -> PieceResult<Method> {
        let method = props.require_text("method")?;
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            PieceError::validation("method", format!("Unsupported method '{}'", method))
        })
    }

    /// Header name and value as they will be sent, rejected before any request goes out
    fn header(key: &str, value: &serde_json::Value) -> PieceResult<(String, String)> {
        HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            PieceError::validation("headers", format!("Invalid header name '{}'", key))
        })?;

        let value = JsonUtils::to_query_value(value);
        HeaderValue::from_str(&value).map_err(|_| {
            PieceError::validation("headers", format!("Invalid value for header '{}'", key))
        })?;

        Ok((key.to_string(), value))
    }
}

impl Action for CustomApiCall {
    fn definition(&self) -> ActionDefinition {
        ActionDefinition {
            name: "custom_api_call",
            display_name: "Custom API Call",
            description: "Make a custom API call to a specific endpoint",
            props: vec![
                Property::short_text("url", "URL")
                    .with_description("Path relative to the API URL, e.g. /v1/tickets")
                    .required(),
                Property::static_dropdown(
                    "method",
                    "Method",
                    options(&[
                        ("GET", "GET"),
                        ("POST", "POST"),
                        ("PATCH", "PATCH"),
                        ("PUT", "PUT"),
                        ("DELETE", "DELETE"),
                        ("HEAD", "HEAD"),
                    ]),
                )
                .required(),
                Property::json("headers", "Headers").with_description(
                    "Authorization headers are injected automatically from your connection.",
                ),
                Property::json("queryParams", "Query Parameters"),
                Property::json("body", "Body"),
            ],
        }
    }

    fn build(&self, props: &PropsValue) -> PieceResult<ApiRequest> {
        let mut request =
            ApiRequest::new(Self::method(props)?, Self::path(props)?).expect_any_status();

        if let Some(headers) = props.object("headers") {
            for (key, value) in headers {
                let (key, value) = Self::header(key, value)?;
                request = request.with_header(key, value);
            }
        }

        if let Some(params) = props.object("queryParams") {
            let mut query = QueryParams::new();
            for (key, value) in params {
                if JsonUtils::is_present(value) {
                    query.push(key.as_str(), JsonUtils::to_query_value(value));
                }
            }
            request = request.with_query(query);
        }

        if let Some(body) = props.get("body") {
            request = request.with_body(body.clone());
        }

        Ok(request)
    }
}
