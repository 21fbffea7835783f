//! 请求追踪中间件
//!
//! 记录请求开始时间并生成追踪 ID，响应返回后记录耗时。

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::web::types::{AppState, TraceContext};

/// 响应头中的追踪 ID
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// 为每个请求附加 [`TraceContext`] 并记录耗时
pub async fn track_request(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let trace = TraceContext::new();

    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        trace_id = %trace.trace_id,
        "Request"
    );

    state.metrics.record_http_request();
    request.extensions_mut().insert(trace.clone());

    let mut response = next.run(request).await;

    state.metrics.record_response_time(started.elapsed());
    if let Ok(value) = HeaderValue::from_str(&trace.trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}
