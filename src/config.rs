//! 应用配置汇总
//!
//! 所有字段都来自环境变量，见 [`crate::env`]。

use crate::cache::CacheConfig;
use crate::env::{self, EnvResult, EnvVar};
use crate::translation::TranslatorConfig;
use crate::web::WebConfig;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub web: WebConfig,
    pub cache: CacheConfig,
    pub translator: TranslatorConfig,
    /// 请求未指定 `target_lang` 时使用
    pub default_target_lang: String,
    pub log_level: String,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            web: WebConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            translator: TranslatorConfig::from_env()?,
            default_target_lang: env::translation::TargetLang::get()?,
            log_level: env::core::LogLevel::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        self.web.validate()?;

        if self.cache.ttl.is_zero() {
            return Err(env::EnvError {
                variable: env::cache::Ttl::NAME.to_string(),
                message: "TTL must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn log_summary(&self) {
        tracing::info!(
            listen = %self.web.listen_address(),
            cache_backend = %self.cache.backend,
            redis = %self.cache.redis.url(),
            cache_ttl_secs = self.cache.ttl.as_secs(),
            upstream = %self.translator.api_url,
            upstream_enabled = self.translator.upstream_enabled,
            default_target_lang = %self.default_target_lang,
            "Configuration loaded"
        );
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            cache: CacheConfig::default(),
            translator: TranslatorConfig::default(),
            default_target_lang: "fr".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.web.port, 5000);
        assert_eq!(config.default_target_lang, "fr");
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert_eq!(config.translator.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let mut config = AppConfig::default();
        config.cache.ttl = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
