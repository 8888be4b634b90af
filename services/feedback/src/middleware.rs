//! Middleware for CORS and request logging

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{debug, info, warn};

use crate::config::CorsConfig;

/// CORS layer factory
///
/// A literal `*` header list cannot be combined with credentials, so `*`
/// mirrors the headers named in the preflight request instead.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age_seconds));

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    cors = cors.allow_origin(AllowOrigin::list(origins));

    let methods: Result<Vec<Method>, _> = config
        .allowed_methods
        .iter()
        .map(|method| method.parse())
        .collect();
    match methods {
        Ok(methods) => cors = cors.allow_methods(methods),
        Err(e) => warn!("Ignoring invalid CORS methods: {}", e),
    }

    if config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_headers(AllowHeaders::mirror_request());
    } else {
        let headers: Result<Vec<HeaderName>, _> = config
            .allowed_headers
            .iter()
            .map(|header| header.parse())
            .collect();
        match headers {
            Ok(headers) => cors = cors.allow_headers(headers),
            Err(e) => warn!("Ignoring invalid CORS headers: {}", e),
        }
    }

    cors
}

/// Answer allowed preflights with 204 and refuse disallowed origins with 400
///
/// Must sit outside the CORS layer, which answers every OPTIONS request with
/// 200 and simply omits `Access-Control-Allow-Origin` for unknown origins.
pub async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let has_origin = request.headers().contains_key(header::ORIGIN);
    let mut response = next.run(request).await;
    if !is_preflight || response.status() != StatusCode::OK {
        return response;
    }

    if has_origin
        && !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    {
        debug!("Rejected preflight from disallowed origin");
        return (StatusCode::BAD_REQUEST, "Disallowed CORS origin").into_response();
    }

    *response.status_mut() = StatusCode::NO_CONTENT;
    response
}

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = get_client_ip(&request);

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = duration.as_millis(),
        client_ip = %client_ip,
        "Request processed"
    );

    response
}

/// Extract client IP from proxy headers
fn get_client_ip(request: &Request) -> String {
    if let Some(forwarded_for) = request.headers().get("X-Forwarded-For")
        && let Ok(forwarded_str) = forwarded_for.to_str()
        && let Some(first_ip) = forwarded_str.split(',').next()
    {
        return first_ip.trim().to_string();
    }

    if let Some(real_ip) = request.headers().get("X-Real-IP")
        && let Ok(real_ip_str) = real_ip.to_str()
    {
        return real_ip_str.to_string();
    }

    "unknown".to_string()
}
