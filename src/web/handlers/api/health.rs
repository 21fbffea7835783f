//! 健康检查处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};
use chrono::{SecondsFormat, Utc};

use crate::web::types::{AppState, HealthResponse};

/// GET /health
///
/// 服务在运行即返回 200，缓存连通性单独报告。
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        redis_connected: state.cache_connected().await,
    })
}
