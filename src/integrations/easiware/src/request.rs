//! Outgoing request description
//!
//! Request builders produce an [`ApiRequest`]: method, path relative to the
//! credential's base URL, ordered query pairs, optional JSON body and the
//! status that counts as success. Nothing here touches the network, which
//! keeps every builder a pure function of its props.

use crate::error::PieceResult;
use crate::utils::StringUtils;
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use url::Url;

/// A single call against the Easiware REST API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    /// Status that yields the parsed body; `None` always yields the full response
    pub expected_status: Option<StatusCode>,
}

impl ApiRequest {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            expected_status: Some(StatusCode::OK),
        }
    }

    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post<P: Into<String>>(path: P) -> Self {
        Self::new(Method::POST, path).expect_status(StatusCode::CREATED)
    }

    pub fn patch<P: Into<String>>(path: P) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected_status = Some(status);
        self
    }

    /// Return the full response whatever the status
    pub fn expect_any_status(mut self) -> Self {
        self.expected_status = None;
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query.into_pairs();
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Final URL against a base URL, after single trailing slash removal
    pub fn url(&self, base_url: &str) -> PieceResult<Url> {
        let root = StringUtils::strip_trailing_slash(base_url);
        let mut url = Url::parse(&format!("{}{}", root, self.path))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Ordered query-string builder; repeated keys are kept as separate pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.push((key.into(), value.into()));
    }

    pub fn push_opt<K: Into<String>>(&mut self, key: K, value: Option<String>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// One pair per value; nothing for an empty list
    pub fn push_all<K: Into<String>>(&mut self, key: K, values: Vec<String>) {
        let key = key.into();
        for value in values {
            self.0.push((key.clone(), value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Ordered JSON body builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody(Map<String, Value>);

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn insert_opt<K: Into<String>>(&mut self, key: K, value: Option<Value>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Array field, omitted when the list is empty
    pub fn insert_list<K: Into<String>>(&mut self, key: K, values: Vec<String>) {
        if !values.is_empty() {
            self.insert(key, Value::from(values));
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_url_strips_single_trailing_slash() {
        let request = ApiRequest::get("/v1/status");
        assert_eq!(
            request.url("https://x.test/").unwrap(),
            request.url("https://x.test").unwrap()
        );
        assert_eq!(
            request.url("https://x.test/").unwrap().as_str(),
            "https://x.test/v1/status"
        );
    }

    #[test]
    fn test_url_keeps_repeated_query_pairs() {
        let mut query = QueryParams::new();
        query.push("search", "café & co");
        query.push_all("type", vec!["note".to_string(), "status".to_string()]);
        let request = ApiRequest::get("/v1/ticket-events").with_query(query);

        let url = request.url("https://api.easiware.com").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("search".to_string(), "café & co".to_string()),
                ("type".to_string(), "note".to_string()),
                ("type".to_string(), "status".to_string()),
            ]
        );
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let url = ApiRequest::get("/v1/users")
            .url("https://api.easiware.com")
            .unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiRequest::get("/v1/status").url("not a url").is_err());
    }

    #[test]
    fn test_expected_status_defaults() {
        assert_eq!(
            ApiRequest::get("/v1/status").expected_status,
            Some(StatusCode::OK)
        );
        assert_eq!(
            ApiRequest::post("/v1/tickets").expected_status,
            Some(StatusCode::CREATED)
        );
        assert_eq!(
            ApiRequest::patch("/v1/tickets/1").expected_status,
            Some(StatusCode::OK)
        );
    }

    #[test]
    fn test_json_body_skips_empty_lists() {
        let mut body = JsonBody::new();
        body.insert("source", json!("email"));
        body.insert_list("agentId", Vec::new());
        body.insert_list("contactId", vec!["c1".to_string()]);
        body.insert_opt("subject", None);

        assert_eq!(
            serde_json::to_string(&body.into_value()).unwrap(),
            r#"{"source":"email","contactId":["c1"]}"#
        );
    }
}
