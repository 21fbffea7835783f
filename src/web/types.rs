//! Web 模块的数据类型定义

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{self, CacheStore};
use crate::config::AppConfig;
use crate::error::{CacheResult, ServerError};
use crate::metrics::{CacheStatus, MetricsAggregator};
use crate::translation::Translator;

/// 应用状态
///
/// 缓存的阻塞调用都放在 `spawn_blocking` 中执行。
pub struct AppState {
    pub metrics: MetricsAggregator,
    pub cache: Arc<dyn CacheStore>,
    pub translator: Translator,
    pub cache_ttl: Duration,
    pub default_target_lang: String,
}

impl AppState {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        translator: Translator,
        cache_ttl: Duration,
        default_target_lang: impl Into<String>,
    ) -> Self {
        Self {
            metrics: MetricsAggregator::new(),
            cache,
            translator,
            cache_ttl,
            default_target_lang: default_target_lang.into(),
        }
    }

    /// 按配置初始化缓存后端和翻译器
    pub async fn from_config(config: &AppConfig) -> Result<Self, ServerError> {
        let cache_config = config.cache.clone();
        let cache = tokio::task::spawn_blocking(move || cache::connect_cache(&cache_config)).await?;
        let translator = Translator::new(config.translator.clone())?;

        Ok(Self::new(
            cache,
            translator,
            config.cache.ttl,
            config.default_target_lang.clone(),
        ))
    }

    pub async fn cache_get(&self, key: &str) -> CacheResult<Option<String>> {
        let cache = Arc::clone(&self.cache);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || cache.get(&key)).await?
    }

    pub async fn cache_put(&self, key: &str, value: &str) -> CacheResult<()> {
        let cache = Arc::clone(&self.cache);
        let (key, value, ttl) = (key.to_string(), value.to_string(), self.cache_ttl);
        tokio::task::spawn_blocking(move || cache.put(&key, &value, ttl)).await?
    }

    /// 缓存后端当前是否可用
    pub async fn cache_connected(&self) -> bool {
        let cache = Arc::clone(&self.cache);
        tokio::task::spawn_blocking(move || cache.ping())
            .await
            .unwrap_or(false)
    }

    /// 后端类型、连通性和条目数估算
    pub async fn cache_status(&self) -> CacheStatus {
        let cache = Arc::clone(&self.cache);
        let status = tokio::task::spawn_blocking(move || {
            let connected = cache.ping();
            let entries = match cache.keys(cache::KEY_PREFIX) {
                Ok(keys) => Some(keys.len()),
                Err(e) => {
                    tracing::debug!(error = %e, "无法统计缓存条目");
                    None
                }
            };
            CacheStatus::new(cache.backend(), connected, entries)
        })
        .await;

        status.unwrap_or_else(|_| CacheStatus::new(self.cache.backend(), false, None))
    }
}

/// 每个请求的追踪上下文
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
}

impl TraceContext {
    /// 由请求开始时间生成
    pub fn new() -> Self {
        Self {
            trace_id: format!("trace_{}", chrono::Utc::now().timestamp_millis()),
        }
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 翻译请求
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_lang: Option<String>,
}

/// 翻译响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub cached: bool,
    pub trace_id: String,
}

/// 指标摘要响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_hit_rate: f64,
    pub translation_errors: u64,
    pub avg_response_time_seconds: f64,
    pub redis_connected: bool,
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub redis_connected: bool,
}
