//! Shared helpers for the mock-server tests

#![allow(dead_code)]

use easiware_integration::{EasiwareAuth, EasiwarePiece, HttpConfig, RawProps};
use serde_json::Value;
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

pub fn bearer() -> String {
    format!("Bearer {}", API_KEY)
}

pub fn auth_for(server: &MockServer) -> EasiwareAuth {
    EasiwareAuth::new(server.uri(), API_KEY)
}

/// Credentials whose API URL ends with a slash
pub fn slashed_auth_for(server: &MockServer) -> EasiwareAuth {
    EasiwareAuth::new(format!("{}/", server.uri()), API_KEY)
}

pub fn piece() -> EasiwarePiece {
    EasiwarePiece::new(&HttpConfig::default()).expect("Failed to create piece")
}

pub fn raw(value: Value) -> RawProps {
    value.as_object().cloned().expect("props must be a JSON object")
}
