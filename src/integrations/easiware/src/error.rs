//! Error handling module for the Easiware integration piece
//!
//! Only genuine failures end up here: transport errors, malformed input and
//! schema violations. An unexpected HTTP status from an action is not an
//! error; see [`crate::models::ActionOutcome`].

use thiserror::Error;

/// Result type alias for piece operations
pub type PieceResult<T> = Result<T, PieceError>;

/// Error types for the Easiware piece
#[derive(Error, Debug)]
pub enum PieceError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client errors (DNS, refused connection, timeout, ...)
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Base URL or path could not be turned into a request URL
    #[error("Invalid URL: {source}")]
    InvalidUrl {
        #[from]
        source: url::ParseError,
    },

    /// Input property errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Non-success answer on a call that must succeed (webhook subscribe/detach)
    #[error("External API error for {service}: {status_code} - {message}")]
    ExternalApi {
        service: String,
        status_code: u16,
        message: String,
    },

    /// Trigger store errors
    #[error("Trigger store error: {message}")]
    Store { message: String },

    /// Unknown action or trigger
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PieceError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new external API error
    pub fn external_api<S1: Into<String>, S2: Into<String>>(
        service: S1,
        status_code: u16,
        message: S2,
    ) -> Self {
        Self::ExternalApi {
            service: service.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PieceError::Configuration { .. } => "CONFIGURATION_ERROR",
            PieceError::HttpClient { .. } => "HTTP_CLIENT_ERROR",
            PieceError::Serialization { .. } => "SERIALIZATION_ERROR",
            PieceError::InvalidUrl { .. } => "INVALID_URL",
            PieceError::Validation { .. } => "VALIDATION_ERROR",
            PieceError::ExternalApi { .. } => "EXTERNAL_API_ERROR",
            PieceError::Store { .. } => "STORE_ERROR",
            PieceError::NotFound { .. } => "NOT_FOUND",
            PieceError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure happened on the wire rather than in our own input
    pub fn is_transport(&self) -> bool {
        matches!(self, PieceError::HttpClient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = PieceError::validation("source", "Required property is missing");
        assert_eq!(
            error.to_string(),
            "Validation error: source - Required property is missing"
        );
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert!(!error.is_transport());
    }

    #[test]
    fn test_external_api_error() {
        let error = PieceError::external_api("easiware", 422, "eventType is invalid");
        assert_eq!(error.error_code(), "EXTERNAL_API_ERROR");
        assert!(error.to_string().contains("422"));
        assert!(error.to_string().contains("eventType is invalid"));
    }

    #[test]
    fn test_not_found_error() {
        let error = PieceError::not_found("Action 'delete_everything'");
        assert_eq!(error.to_string(), "Action 'delete_everything' not found");
        assert_eq!(error.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_error = url::Url::parse("not a url").unwrap_err();
        let error: PieceError = parse_error.into();
        assert_eq!(error.error_code(), "INVALID_URL");
    }
}
