//! 翻译 API 处理器

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, State},
    response::Json,
};

use crate::cache::cache_key;
use crate::error::ApiError;
use crate::metrics::ErrorCategory;
use crate::web::types::{AppState, TraceContext, TranslateRequest, TranslateResponse};

/// 日志中保留的文本长度
const LOG_PREVIEW_CHARS: usize = 30;

/// POST /translate
///
/// 缓存命中直接返回；未命中时解析翻译、写入缓存后返回。
pub async fn translate_text(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<TraceContext>,
    body: Bytes,
) -> Result<Json<TranslateResponse>, ApiError> {
    state.metrics.record_translate_request();

    let (text, target_lang) = match parse_request(&body, &state.default_target_lang) {
        Ok(parsed) => parsed,
        Err(e) => {
            state.metrics.record_error(ErrorCategory::InvalidInput);
            tracing::info!(trace_id = %trace.trace_id, error = %e, "Rejected translate request");
            return Err(e);
        }
    };

    match translate_cached(&state, &trace, &text, &target_lang).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            state.metrics.record_error(ErrorCategory::Internal);
            tracing::error!(
                trace_id = %trace.trace_id,
                error = ?e,
                "Error: translate request failed"
            );
            Err(e)
        }
    }
}

/// 校验请求体，返回去除首尾空白的文本和目标语言
fn parse_request(body: &[u8], default_target_lang: &str) -> Result<(String, String), ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::MissingBody)?;

    // 空对象与缺失请求体同样处理
    match value.as_object() {
        Some(object) if !object.is_empty() => {}
        _ => return Err(ApiError::MissingBody),
    }

    let request: TranslateRequest = serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid request: {}", e)))?;

    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::InvalidInput("Text is required".to_string()));
    }

    let target_lang = request
        .target_lang
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| default_target_lang.to_string());

    Ok((text.to_string(), target_lang))
}

async fn translate_cached(
    state: &AppState,
    trace: &TraceContext,
    text: &str,
    target_lang: &str,
) -> Result<TranslateResponse, ApiError> {
    let key = cache_key(text, target_lang);

    if let Some(cached) = state.cache_get(&key).await?.filter(|v| !v.is_empty()) {
        state.metrics.record_cache_hit();
        tracing::info!(trace_id = %trace.trace_id, "Cache hit: {}...", preview(text));
        return Ok(TranslateResponse {
            translated_text: cached,
            cached: true,
            trace_id: trace.trace_id.clone(),
        });
    }

    let resolution = state.translator.resolve(text, target_lang).await;
    state.metrics.record_resolution(&resolution);
    let source = resolution.source();
    let translated = resolution.into_text();

    state.cache_put(&key, &translated).await?;
    tracing::info!(
        trace_id = %trace.trace_id,
        source = %source,
        "New translation: {}... → {}...",
        preview(text),
        preview(&translated)
    );

    Ok(TranslateResponse {
        translated_text: translated,
        cached: false,
        trace_id: trace.trace_id.clone(),
    })
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
