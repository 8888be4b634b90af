//! Feedback service server implementation

use anyhow::Result;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc, time::Duration, time::Instant};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    aggregator::BoundedAggregator,
    config::FeedbackConfig,
    handlers::{FeedbackHandlers, HealthHandlers},
    metrics,
    middleware::{create_cors_layer, logging_middleware, preflight_no_content},
};

/// Unified application state containing all handlers
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    pub feedback_handlers: FeedbackHandlers,
    pub health_handlers: HealthHandlers,
}

/// Feedback service server; owns the aggregator for the process lifetime
pub struct FeedbackServer {
    config: FeedbackConfig,
    aggregator: Arc<BoundedAggregator>,
    metrics: Option<PrometheusHandle>,
    start_time: Instant,
}

impl FeedbackServer {
    /// Create a server with an empty window, installing the metrics recorder if enabled
    pub fn new(config: FeedbackConfig) -> Result<Self> {
        info!("Initializing feedback service");

        let metrics = if config.monitoring.metrics_enabled {
            match metrics::install_recorder() {
                Ok(handle) => {
                    info!("Prometheus recorder installed");
                    Some(handle)
                }
                Err(e) => {
                    error!("Failed to install Prometheus recorder: {}", e);
                    return Err(e);
                }
            }
        } else {
            None
        };

        Ok(Self::with_aggregator(
            config,
            Arc::new(BoundedAggregator::default()),
            metrics,
        ))
    }

    /// Create a server around an existing aggregator
    #[must_use]
    pub fn with_aggregator(
        config: FeedbackConfig,
        aggregator: Arc<BoundedAggregator>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config,
            aggregator,
            metrics,
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn aggregator(&self) -> Arc<BoundedAggregator> {
        Arc::clone(&self.aggregator)
    }

    /// Start the server and run until a shutdown signal arrives
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self.config.server_address().parse().map_err(|e| {
            error!(
                "Invalid server address '{}': {}",
                self.config.server_address(),
                e
            );
            anyhow::anyhow!("Invalid server address: {}", e)
        })?;

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind TCP listener to {}: {}", addr, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", addr, e)
        })?;

        info!(
            "Feedback service listening on {} (window capacity {})",
            addr,
            self.aggregator.capacity()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("Server encountered a fatal error: {}", e);
                anyhow::anyhow!("Server error: {}", e)
            })?;

        info!("Feedback service stopped");
        Ok(())
    }

    /// Build the Axum application with all routes and middleware
    #[must_use]
    pub fn router(&self) -> Router {
        let app_state = AppState {
            feedback_handlers: FeedbackHandlers::new(Arc::clone(&self.aggregator)),
            health_handlers: HealthHandlers::new(
                Arc::clone(&self.aggregator),
                self.metrics.clone(),
                self.start_time,
            ),
        };

        let monitoring = &self.config.monitoring;
        let mut routes = Router::new()
            .route(
                "/submit",
                post(FeedbackHandlers::submit).options(FeedbackHandlers::preflight),
            )
            .route("/stats", get(FeedbackHandlers::stats))
            .route(&monitoring.health_path, get(HealthHandlers::health_check));
        if monitoring.metrics_enabled {
            routes = routes.route(&monitoring.metrics_path, get(HealthHandlers::metrics));
        }

        let mut app = routes
            .with_state(app_state)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.timeout_seconds,
            )))
            .layer(middleware::from_fn(logging_middleware))
            .layer(TraceLayer::new_for_http());

        if self.config.server.compression {
            app = app.layer(CompressionLayer::new());
        }

        if self.config.cors.enabled {
            app = app
                .layer(create_cors_layer(&self.config.cors))
                .layer(middleware::from_fn(preflight_no_content));
        } else {
            warn!("CORS disabled; browser clients on other origins will be blocked");
        }

        app
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// API route documentation
pub fn print_routes() {
    println!("Feedback Service Routes:");
    println!("========================");
    println!();
    println!("Feedback:");
    println!("  POST    /submit   - Submit a survey response (204)");
    println!("  OPTIONS /submit   - CORS preflight (204)");
    println!("  GET     /stats    - Window size and average ratings");
    println!();
    println!("Health & Monitoring:");
    println!("  GET     /health   - Health check");
    println!("  GET     /metrics  - Prometheus metrics");
}
