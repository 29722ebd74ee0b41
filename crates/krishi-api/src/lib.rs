//! # krishi-api
//!
//! Typed HTTP client for the Krishi Mitra backend.
//! One async method per endpoint; every non-2xx status or malformed body
//! surfaces as an `ApiError`.

pub mod client;

pub use client::*;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Same-origin requests
pub const DEFAULT_BASE_URL: &str = "";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request never got a response
    #[error("{0}")]
    Network(String),

    /// Non-2xx status; `message` comes from the body when it has one
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Body did not match the expected shape
    #[error("Invalid data received from server: {0}")]
    Decode(String),

    /// 2xx body that reports a failure
    #[error("{0}")]
    Server(String),

    /// Request body could not be built
    #[error("could not build request: {0}")]
    Request(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiError {
    /// Error for a non-2xx response; prefers the body's `error` field
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Server error: {}", status));
        Self::Http { status, message }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Decode a response body
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Backend endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    NearestDistricts,
    DistrictData,
    CreateChat,
    ChatHistory,
    DeleteChat(String),
    ProcessText,
    ProcessVoice,
    ProcessImage,
    AnalyzeSoilReport,
    CompleteSoilAnalysis,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Self::NearestDistricts => "/api/advance-mandi/nearest-districts".into(),
            Self::DistrictData => "/api/advance-mandi/district-data".into(),
            Self::CreateChat => "/api/create_chat".into(),
            Self::ChatHistory => "/api/get_chat_history".into(),
            Self::DeleteChat(id) => format!("/api/delete_chat/{}", id),
            Self::ProcessText => "/api/process_text".into(),
            Self::ProcessVoice => "/api/process_voice".into(),
            Self::ProcessImage => "/api/process_image".into(),
            Self::AnalyzeSoilReport => "/api/analyze_soil_report".into(),
            Self::CompleteSoilAnalysis => "/api/complete_soil_analysis".into(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Prefix for every endpoint path; empty for same origin
    pub base_url: String,
    /// Send `Cache-Control: no-cache` on chat requests
    pub no_cache: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            no_cache: true,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn no_cache(mut self, enabled: bool) -> Self {
        self.no_cache = enabled;
        self
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::{DistrictPayload, NearestDistrict};

    #[test]
    fn test_endpoint_urls() {
        let config = ApiConfig::new().base_url("https://krishi.example/");
        assert_eq!(
            config.url(&Endpoint::DistrictData),
            "https://krishi.example/api/advance-mandi/district-data"
        );
        assert_eq!(
            ApiConfig::default().url(&Endpoint::DeleteChat("12".into())),
            "/api/delete_chat/12"
        );
    }

    #[test]
    fn test_error_body_or_status() {
        assert_eq!(
            ApiError::from_status(400, r#"{"error": "District not found"}"#).to_string(),
            "District not found"
        );
        assert_eq!(
            ApiError::from_status(502, "<html>Bad gateway</html>").to_string(),
            "Server error: 502"
        );
        assert_eq!(ApiError::from_status(500, r#"{"error": ""}"#).to_string(), "Server error: 500");
    }

    #[test]
    fn test_decode_payloads() {
        let districts: Vec<NearestDistrict> = decode(
            r#"[{"district_name": "Nashik", "state_name": "Maharashtra", "distance": 12.345}]"#,
        )
        .unwrap();
        assert_eq!(districts[0].distance_label(), "12.35 km");

        let payload: DistrictPayload = decode(r#"{"table_data": []}"#).unwrap();
        assert!(payload.table_data.is_empty());

        let wrong = decode::<Vec<NearestDistrict>>(r#"{"district_name": "x"}"#);
        assert!(matches!(wrong, Err(ApiError::Decode(_))));
    }
}
