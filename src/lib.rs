//! # Translation API
//!
//! 接收文本和目标语言并返回译文的 HTTP 服务，翻译结果写入缓存以避免重复调用上游。
//!
//! ## 模块组织
//!
//! - `cache` - 缓存接口及 Redis / 内存两种后端
//! - `translation` - 上游翻译调用与兜底翻译表
//! - `metrics` - 请求计数、响应时间窗口和 Prometheus 输出
//! - `web` - 路由、中间件和处理器
//! - `config` / `env` - 基于环境变量的配置
//! - `error` - 错误类型

pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod metrics;
pub mod translation;
pub mod web;

pub use cache::{cache_key, CacheStore};
pub use config::AppConfig;
pub use error::{ApiError, CacheError, ServerError};
pub use metrics::MetricsAggregator;
pub use translation::{mock_translation, Resolution, Translator};
