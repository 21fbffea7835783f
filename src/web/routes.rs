//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/translate", post(translate_text))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/metrics/prometheus", get(prometheus_metrics))
        .route("/metrics/detailed", get(detailed_metrics))
}
