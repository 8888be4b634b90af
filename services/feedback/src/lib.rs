//! Feedback collection service
//!
//! Accepts survey submissions over HTTP and keeps running statistics over
//! the most recent window of them. Features:
//! - Bounded FIFO window with O(1) running averages
//! - Explicit submission validation with per-field errors
//! - CORS for the local survey and dashboard frontends
//! - Prometheus metrics and health endpoint

#![allow(missing_docs)]

use anyhow::Result;

pub mod aggregator;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod server;
pub mod validation;

pub use aggregator::{BoundedAggregator, Record, Stats, WINDOW_CAPACITY};
pub use config::{CorsConfig, FeedbackConfig, MonitoringConfig, ServerConfig};
pub use server::FeedbackServer;

/// Start the feedback service
pub async fn start_server(config: FeedbackConfig) -> Result<()> {
    let server = FeedbackServer::new(config)?;
    server.start().await
}
