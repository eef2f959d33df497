//! HTTP dispatch against the Easiware REST API
//!
//! One action is one request. Every call carries the bearer token and a JSON
//! content type. Transport failures come back as errors; any HTTP answer,
//! whatever its status, comes back as an [`ApiResponse`].

use crate::actions::Action;
use crate::auth::EasiwareAuth;
use crate::config::HttpConfig;
use crate::error::{PieceError, PieceResult};
use crate::metrics::{DispatchMetrics, DispatchResult};
use crate::models::{ActionOutcome, ApiResponse, RawProps};
use crate::props::PropsValue;
use crate::request::ApiRequest;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Authenticated client bound to one credential pair
#[derive(Debug, Clone)]
pub struct EasiwareClient {
    http: Client,
    auth: EasiwareAuth,
    metrics: Arc<DispatchMetrics>,
}

impl EasiwareClient {
    /// Create a client with its own connection pool
    pub fn new(auth: EasiwareAuth, config: &HttpConfig) -> PieceResult<Self> {
        let http = Self::build_http(config)?;
        Ok(Self::with_http(http, auth, Arc::new(DispatchMetrics::new())))
    }

    /// Reuse an existing connection pool and metrics collector
    pub fn with_http(http: Client, auth: EasiwareAuth, metrics: Arc<DispatchMetrics>) -> Self {
        Self {
            http,
            auth,
            metrics,
        }
    }

    pub fn build_http(config: &HttpConfig) -> PieceResult<Client> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| PieceError::internal(format!("Failed to create HTTP client: {}", e)))
    }

    pub fn auth(&self) -> &EasiwareAuth {
        &self.auth
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Issue one request and return the response whatever its status
    pub async fn send(&self, operation: &str, request: &ApiRequest) -> PieceResult<ApiResponse> {
        let url = request.url(&self.auth.app_url)?;

        debug!(
            operation = operation,
            method = %request.method,
            path = %request.path,
            "Sending Easiware request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(AUTHORIZATION, self.auth.bearer())
            .header(CONTENT_TYPE, "application/json");

        for (key, value) in &request.headers {
            if key.eq_ignore_ascii_case(AUTHORIZATION.as_str())
                || key.eq_ignore_ascii_case(CONTENT_TYPE.as_str())
            {
                continue;
            }
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_failure(operation, started, e)),
        };

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Err(self.transport_failure(operation, started, e)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let api_response = ApiResponse {
            status,
            headers,
            body: ApiResponse::parse_body(&text),
        };

        let result = match request.expected_status {
            Some(expected) if expected.as_u16() == status => DispatchResult::Expected,
            None if api_response.is_success() => DispatchResult::Expected,
            _ => DispatchResult::UnexpectedStatus,
        };
        self.metrics.record(operation, result, elapsed_ms);

        if result == DispatchResult::Expected {
            debug!(
                operation = operation,
                status = status,
                elapsed_ms = elapsed_ms,
                "Easiware request completed"
            );
        } else {
            info!(
                operation = operation,
                status = status,
                expected = ?request.expected_status.map(|s| s.as_u16()),
                "Easiware answered with an unexpected status"
            );
        }

        Ok(api_response)
    }

    fn transport_failure(
        &self,
        operation: &str,
        started: Instant,
        error: reqwest::Error,
    ) -> PieceError {
        self.metrics.record(
            operation,
            DispatchResult::TransportFailure,
            started.elapsed().as_millis() as u64,
        );
        warn!(operation = operation, error = %error, "Easiware request failed");
        error.into()
    }

    /// Issue one request and map it to the action outcome
    pub async fn dispatch(
        &self,
        operation: &str,
        request: &ApiRequest,
    ) -> PieceResult<ActionOutcome> {
        let response = self.send(operation, request).await?;

        Ok(match request.expected_status {
            Some(expected) if expected.as_u16() == response.status => {
                ActionOutcome::Body(response.body)
            }
            _ => ActionOutcome::Response(response),
        })
    }

    /// Resolve props, build the request and dispatch it
    pub async fn run_action(
        &self,
        action: &dyn Action,
        raw: &RawProps,
    ) -> PieceResult<ActionOutcome> {
        let definition = action.definition();
        let props = PropsValue::resolve(&definition.props, raw)?;
        let request = action.build(&props)?;
        self.dispatch(definition.name, &request).await
    }
}
