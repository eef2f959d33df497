//! Utility functions shared by every request builder
//!
//! The two rules every action follows live here: the sparse-update presence
//! test and the comma-separated list splitter.

use serde_json::{Map, Value};

/// String utility functions
pub struct StringUtils;

impl StringUtils {
    /// Split a comma-separated list, trimming tokens and dropping empty ones.
    ///
    /// `"a, b ,,c"` becomes `["a", "b", "c"]`.
    pub fn split_csv(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Strip a single trailing slash from a base URL.
    ///
    /// Only one slash is removed: `https://x.test//` stays `https://x.test/`.
    pub fn strip_trailing_slash(url: &str) -> &str {
        url.strip_suffix('/').unwrap_or(url)
    }

    /// Percent-encode a value for use as one path segment.
    ///
    /// `"t-1?x#y"` becomes `"t-1%3Fx%23y"`, so an ID can never add a query,
    /// a fragment or another segment to the request path.
    pub fn path_segment(value: &str) -> String {
        url::form_urlencoded::byte_serialize(value.as_bytes())
            .collect::<String>()
            .replace('+', "%20")
    }

    /// Mask an API key for log output
    pub fn mask_secret(secret: &str) -> String {
        let visible = 4;
        let length = secret.chars().count();
        if length <= visible * 2 {
            "*".repeat(length.min(8))
        } else {
            let prefix: String = secret.chars().take(visible).collect();
            format!("{}****", prefix)
        }
    }
}

/// JSON utility functions
pub struct JsonUtils;

impl JsonUtils {
    /// Sparse-update rule: a value is transmitted unless it is null or `""`.
    ///
    /// Absent values never reach this function; callers model them as `None`.
    pub fn is_present(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Query-string rendition of a scalar value
    pub fn to_query_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// `Some(object)` only for a JSON object holding at least one key
    pub fn non_empty_object(value: &Value) -> Option<&Map<String, Value>> {
        value.as_object().filter(|object| !object.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_csv() {
        assert_eq!(StringUtils::split_csv("a, b ,,c"), vec!["a", "b", "c"]);
        assert_eq!(StringUtils::split_csv("single"), vec!["single"]);
        assert!(StringUtils::split_csv(" , ,").is_empty());
        assert!(StringUtils::split_csv("").is_empty());
    }

    #[test]
    fn test_strip_trailing_slash() {
        assert_eq!(
            StringUtils::strip_trailing_slash("https://x.test/"),
            "https://x.test"
        );
        assert_eq!(
            StringUtils::strip_trailing_slash("https://x.test"),
            "https://x.test"
        );
        assert_eq!(
            StringUtils::strip_trailing_slash("https://x.test//"),
            "https://x.test/"
        );
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(StringUtils::path_segment("t-1"), "t-1");
        assert_eq!(StringUtils::path_segment("shoe_size"), "shoe_size");
        assert_eq!(
            StringUtils::path_segment("t-1?deleted=true#x"),
            "t-1%3Fdeleted%3Dtrue%23x"
        );
        assert_eq!(StringUtils::path_segment("a/b c+d"), "a%2Fb%20c%2Bd");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(StringUtils::mask_secret("abcdefghijkl"), "abcd****");
        assert_eq!(StringUtils::mask_secret("short"), "*****");
    }

    #[test]
    fn test_is_present() {
        assert!(!JsonUtils::is_present(&Value::Null));
        assert!(!JsonUtils::is_present(&json!("")));
        assert!(JsonUtils::is_present(&json!(" ")));
        assert!(JsonUtils::is_present(&json!(false)));
        assert!(JsonUtils::is_present(&json!(0)));
        assert!(JsonUtils::is_present(&json!({})));
        assert!(JsonUtils::is_present(&json!([])));
    }

    #[test]
    fn test_to_query_value() {
        assert_eq!(JsonUtils::to_query_value(&json!("FR")), "FR");
        assert_eq!(JsonUtils::to_query_value(&json!(true)), "true");
        assert_eq!(JsonUtils::to_query_value(&json!(false)), "false");
        assert_eq!(JsonUtils::to_query_value(&json!(42)), "42");
    }

    #[test]
    fn test_non_empty_object() {
        assert!(JsonUtils::non_empty_object(&json!({})).is_none());
        assert!(JsonUtils::non_empty_object(&json!("x")).is_none());
        assert!(JsonUtils::non_empty_object(&json!({"vip": true})).is_some());
    }
}
