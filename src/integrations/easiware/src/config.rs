//! Configuration module for the Easiware integration piece
//!
//! Settings come from defaults, an optional file named by
//! `EASIWARE_CONFIG_FILE`, and `EASIWARE__*` environment variables
//! (for example `EASIWARE__AUTH__API_KEY`).

use crate::auth::{EasiwareAuth, DEFAULT_APP_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main configuration structure for the piece
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PieceConfig {
    /// Credentials of the configured instance
    #[validate]
    pub auth: AuthConfig,
    /// Outgoing HTTP client settings
    pub http: HttpConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

/// Credential configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// API root URL (default: https://api.easiware.com)
    #[validate(url)]
    pub app_url: String,
    /// API key generated in the Easiware back office
    #[validate(length(min = 1, message = "API key cannot be empty"))]
    pub api_key: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds; unset leaves the client without one
    pub request_timeout: Option<u64>,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log format (json, pretty, text, compact)
    pub log_format: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            app_url: DEFAULT_APP_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("easiware-integration/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl AuthConfig {
    pub fn credentials(&self) -> EasiwareAuth {
        EasiwareAuth::new(self.app_url.clone(), self.api_key.clone())
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }
}

impl PieceConfig {
    /// Load configuration from environment variables and the optional file
    pub fn from_env() -> Result<Self, ::config::ConfigError> {
        let mut cfg = ::config::Config::builder()
            .set_default("auth.app_url", DEFAULT_APP_URL)?
            .set_default("auth.api_key", "")?
            .set_default("http.user_agent", HttpConfig::default().user_agent)?
            .set_default("observability.log_level", "info")?
            .set_default("observability.log_format", "json")?;

        // Load from optional config file
        if let Ok(config_path) = std::env::var("EASIWARE_CONFIG_FILE") {
            cfg = cfg.add_source(::config::File::with_name(&config_path).required(false));
        }

        cfg = cfg.add_source(
            ::config::Environment::with_prefix("EASIWARE")
                .prefix_separator("__")
                .separator("__"),
        );

        cfg.build()?.try_deserialize()
    }

    /// Validate the configuration
    pub fn validate_all(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        if self.http.request_timeout == Some(0) {
            return Err("HTTP request timeout cannot be 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> PieceConfig {
        let mut config = PieceConfig::default();
        config.auth.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = PieceConfig::default();
        assert_eq!(config.auth.app_url, "https://api.easiware.com");
        assert!(config.http.request_timeout.is_none());
        assert!(config.http.timeout().is_none());
        assert_eq!(config.observability.log_format, "json");
    }

    #[test]
    fn test_config_validation() {
        let mut config = configured();
        assert!(config.validate_all().is_ok());

        config.auth.api_key = String::new();
        assert!(config.validate_all().is_err());

        config.auth.api_key = "test-key".to_string();
        config.auth.app_url = "api.easiware.com without scheme".to_string();
        assert!(config.validate_all().is_err());

        config.auth.app_url = "https://tenant.easiware.test/".to_string();
        config.http.request_timeout = Some(0);
        assert!(config.validate_all().is_err());

        config.http.request_timeout = Some(30);
        assert!(config.validate_all().is_ok());
        assert_eq!(config.http.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_credentials_from_config() {
        let config = configured();
        let auth = config.auth.credentials();
        assert_eq!(auth.app_url, "https://api.easiware.com");
        assert_eq!(auth.api_key, "test-key");
    }

    #[test]
    fn test_user_agent_carries_version() {
        let config = HttpConfig::default();
        assert!(config.user_agent.starts_with("easiware-integration/"));
    }
}
