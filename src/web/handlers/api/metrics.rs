//! 指标 API 处理器

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};

use crate::web::types::{AppState, MetricsResponse};

/// Prometheus 文本格式的 Content-Type
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let snapshot = state.metrics.snapshot();

    Json(MetricsResponse {
        total_requests: snapshot.total_requests,
        cache_hits: snapshot.cache_hits,
        cache_hit_rate: snapshot.cache_hit_rate,
        translation_errors: snapshot.translation_errors,
        avg_response_time_seconds: snapshot.avg_response_time_seconds,
        redis_connected: state.cache_connected().await,
    })
}

/// GET /metrics/prometheus
pub async fn prometheus_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Serving Prometheus metrics");

    let cache_status = state.cache_status().await;
    let body = state.metrics.render_prometheus(&cache_status);

    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body)
}

/// GET /metrics/detailed
pub async fn detailed_metrics(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.metrics.snapshot();
    let cache_status = state.cache_status().await;

    Json(serde_json::json!({
        "application": {
            "total_requests": snapshot.total_requests,
            "http_requests": snapshot.http_requests,
            "cache_hits": snapshot.cache_hits,
            "cache_hit_rate": snapshot.cache_hit_rate,
            "translation_errors": snapshot.translation_errors,
            "errors_by_category": snapshot.errors_by_category,
            "resolutions": snapshot.resolutions,
            "avg_response_time_seconds": snapshot.avg_response_time_seconds,
            "window_size": snapshot.window_size,
            "redis_connected": cache_status.connected,
            "cache": cache_status,
        },
        "endpoints": {
            "json": "/metrics",
            "prometheus": "/metrics/prometheus",
        }
    }))
}
