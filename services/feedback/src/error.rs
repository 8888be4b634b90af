//! Error types surfaced to HTTP clients

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

use crate::models::ErrorResponse;
use crate::validation::ValidationErrors;

/// Request errors; none of them touch aggregator state
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be decoded as a submission
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Body decoded but one or more fields failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(rejection) => rejection.status(),
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Short label used for logs and the rejection metric
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidBody(_) => "invalid_body",
            Self::Validation(_) => "validation_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(code = self.code(), status = %status, "Rejected submission: {}", self);

        let body = match &self {
            Self::InvalidBody(rejection) => {
                ErrorResponse::new(self.code(), rejection.body_text())
            }
            Self::Validation(errors) => {
                let mut details = FxHashMap::default();
                for error in errors.errors() {
                    details
                        .entry(error.field.to_string())
                        .or_insert_with(|| error.message.clone());
                }
                ErrorResponse::new(self.code(), "Submission failed validation")
                    .with_details(details)
            }
        };

        (status, Json(body)).into_response()
    }
}
