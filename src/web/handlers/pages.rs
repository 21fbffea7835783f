//! 页面处理器

use axum::response::Json;

/// GET /
///
/// 服务信息与端点列表
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Translation API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /translate": "Translate text (JSON: {\"text\": \"hello\", \"target_lang\": \"fr\"})",
            "GET /metrics": "Get performance metrics",
            "GET /metrics/prometheus": "Metrics in Prometheus text format",
            "GET /metrics/detailed": "Detailed application metrics",
            "GET /health": "Health check",
        }
    }))
}
