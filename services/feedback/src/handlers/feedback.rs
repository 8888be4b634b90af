//! Submission and statistics handlers

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    aggregator::{BoundedAggregator, Stats},
    error::ApiError,
    metrics,
    models::SubmissionRequest,
    validation,
};

/// Handlers backed by the shared aggregator
#[derive(Clone)]
pub struct FeedbackHandlers {
    aggregator: Arc<BoundedAggregator>,
}

impl std::fmt::Debug for FeedbackHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackHandlers")
            .field("aggregator", &"Arc<BoundedAggregator>")
            .finish()
    }
}

impl FeedbackHandlers {
    pub const fn new(aggregator: Arc<BoundedAggregator>) -> Self {
        Self { aggregator }
    }

    /// `POST /submit`
    pub async fn submit(
        State(handlers): State<Self>,
        payload: Result<Json<SubmissionRequest>, JsonRejection>,
    ) -> Result<StatusCode, ApiError> {
        let record = payload
            .map_err(ApiError::from)
            .and_then(|Json(request)| validation::validate(request).map_err(ApiError::from))
            .inspect_err(|e| metrics::record_rejection(e.code()))?;

        debug!(
            product_rating = record.product_rating,
            service_rating = record.service_rating,
            "Accepted submission"
        );

        handlers.aggregator.submit(record);
        metrics::record_submission(handlers.aggregator.len());

        Ok(StatusCode::NO_CONTENT)
    }

    /// `OPTIONS /submit`, reached only when the CORS layer is disabled
    pub async fn preflight() -> StatusCode {
        StatusCode::NO_CONTENT
    }

    /// `GET /stats`
    pub async fn stats(State(handlers): State<Self>) -> Json<Stats> {
        let stats = handlers.aggregator.snapshot();
        metrics::record_stats(&stats);
        Json(stats)
    }
}
