//! Health check and monitoring handlers

use axum::{extract::State, http::StatusCode, response::Json};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{sync::Arc, time::Instant};
use tracing::debug;

use crate::{aggregator::BoundedAggregator, models::HealthCheckResponse};

/// Health check handlers
#[derive(Clone)]
pub struct HealthHandlers {
    aggregator: Arc<BoundedAggregator>,
    metrics: Option<PrometheusHandle>,
    start_time: Instant,
}

impl std::fmt::Debug for HealthHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthHandlers")
            .field("metrics_enabled", &self.metrics.is_some())
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}

impl HealthHandlers {
    pub const fn new(
        aggregator: Arc<BoundedAggregator>,
        metrics: Option<PrometheusHandle>,
        start_time: Instant,
    ) -> Self {
        Self {
            aggregator,
            metrics,
            start_time,
        }
    }

    /// Health check endpoint
    pub async fn health_check(State(handlers): State<Self>) -> Json<HealthCheckResponse> {
        debug!("Health check request");

        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: handlers.start_time.elapsed().as_secs(),
            records_count: handlers.aggregator.len(),
            capacity: handlers.aggregator.capacity().get(),
        })
    }

    /// Prometheus metrics endpoint
    pub async fn metrics(State(handlers): State<Self>) -> Result<String, StatusCode> {
        handlers
            .metrics
            .as_ref()
            .map(PrometheusHandle::render)
            .ok_or(StatusCode::NOT_FOUND)
    }
}
