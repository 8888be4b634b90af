//! REST API models and request/response types

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Survey submission as posted by the frontend
///
/// Every field is optional at the decoding stage so that missing fields
/// surface as validation errors rather than opaque JSON rejections.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub product_rating: Option<RatingInput>,
    pub service_rating: Option<RatingInput>,
    pub recommend_likelihood: Option<String>,
}

/// Rating as sent on the wire: the survey form posts `"5"`, API clients `5`
///
/// Variant order matters: integers must be tried before floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Integer(i64),
    Number(f64),
    Flag(bool),
    Text(String),
}

/// Error response model
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details, keyed by field name for validation errors
    pub details: Option<FxHashMap<String, String>>,
    /// Response timestamp
    pub timestamp: i64,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: FxHashMap<String, String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Service version
    pub version: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
    /// Records currently in the window
    pub records_count: usize,
    /// Window capacity
    pub capacity: usize,
}
