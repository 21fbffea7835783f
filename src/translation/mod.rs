//! 翻译解析
//!
//! 先调用上游翻译接口，失败时退回静态兜底表，永远返回一个字符串。
//! 失败原因保留在 [`Resolution`] 中，供日志和指标使用。

pub mod fallback;
pub mod upstream;

use std::fmt;
use std::time::Duration;

use crate::env::{self, EnvResult, EnvVar};

pub use fallback::mock_translation;
pub use upstream::UpstreamFailure;

/// 翻译器配置
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// 上游接口地址
    pub api_url: String,
    /// langpair 中固定的源语言
    pub source_lang: String,
    pub timeout: Duration,
    /// 关闭后直接查兜底表
    pub upstream_enabled: bool,
}

impl TranslatorConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            api_url: env::translation::ApiUrl::get()?,
            source_lang: env::translation::SourceLang::get()?,
            timeout: env::translation::Timeout::get()?,
            upstream_enabled: env::translation::UpstreamEnabled::get()?,
        })
    }

    /// 不调用上游的配置
    pub fn offline() -> Self {
        Self {
            upstream_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.mymemory.translated.net/get".to_string(),
            source_lang: "en".to_string(),
            timeout: Duration::from_secs(5),
            upstream_enabled: true,
        }
    }
}

/// 翻译结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    Upstream,
    Fallback,
    Passthrough,
}

impl ResolutionSource {
    pub const ALL: [ResolutionSource; 3] = [
        ResolutionSource::Upstream,
        ResolutionSource::Fallback,
        ResolutionSource::Passthrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Upstream => "upstream",
            ResolutionSource::Fallback => "fallback",
            ResolutionSource::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一次翻译解析的结果
///
/// `cause` 为 `None` 表示上游调用被关闭。
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// 上游成功返回
    Upstream(String),
    /// 命中兜底表
    TableHit {
        text: String,
        cause: Option<UpstreamFailure>,
    },
    /// 兜底表未命中，返回带标记的原文
    TableMiss {
        text: String,
        cause: Option<UpstreamFailure>,
    },
}

impl Resolution {
    /// 最终返回给客户端的文本
    pub fn text(&self) -> &str {
        match self {
            Resolution::Upstream(text)
            | Resolution::TableHit { text, .. }
            | Resolution::TableMiss { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Resolution::Upstream(text)
            | Resolution::TableHit { text, .. }
            | Resolution::TableMiss { text, .. } => text,
        }
    }

    pub fn source(&self) -> ResolutionSource {
        match self {
            Resolution::Upstream(_) => ResolutionSource::Upstream,
            Resolution::TableHit { .. } => ResolutionSource::Fallback,
            Resolution::TableMiss { .. } => ResolutionSource::Passthrough,
        }
    }

    /// 上游失败原因（如果有）
    pub fn upstream_failure(&self) -> Option<&UpstreamFailure> {
        match self {
            Resolution::Upstream(_) => None,
            Resolution::TableHit { cause, .. } | Resolution::TableMiss { cause, .. } => {
                cause.as_ref()
            }
        }
    }

    fn from_fallback(text: &str, target_lang: &str, cause: Option<UpstreamFailure>) -> Self {
        match fallback::lookup(text, target_lang) {
            Some(translated) => Resolution::TableHit {
                text: translated.to_string(),
                cause,
            },
            None => Resolution::TableMiss {
                text: fallback::passthrough(text, target_lang),
                cause,
            },
        }
    }
}

/// 翻译器
///
/// 持有一个复用连接池的 HTTP 客户端，可在请求间共享。
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: TranslatorConfig,
}

impl Translator {
    /// 创建新的翻译器
    pub fn new(config: TranslatorConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// 解析翻译，任何失败都退化为兜底结果
    pub async fn resolve(&self, text: &str, target_lang: &str) -> Resolution {
        if !self.config.upstream_enabled {
            return Resolution::from_fallback(text, target_lang, None);
        }

        match upstream::fetch(&self.client, &self.config, text, target_lang).await {
            Ok(translated) => Resolution::Upstream(translated),
            Err(failure) => {
                tracing::warn!(
                    category = failure.category().as_str(),
                    error = %failure,
                    "翻译服务不可用，使用兜底翻译"
                );
                Resolution::from_fallback(text, target_lang, Some(failure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_resolution_uses_table() {
        let translator = Translator::new(TranslatorConfig::offline()).unwrap();

        let hit = translator.resolve("Hello", "es").await;
        assert_eq!(
            hit,
            Resolution::TableHit {
                text: "hola".to_string(),
                cause: None
            }
        );
        assert_eq!(hit.source(), ResolutionSource::Fallback);

        let miss = translator.resolve("unknown words", "fr").await;
        assert_eq!(miss.source(), ResolutionSource::Passthrough);
        assert_eq!(miss.text(), "[TEST] unknown words → fr");
        assert!(miss.upstream_failure().is_none());
    }

    #[test]
    fn test_resolution_accessors() {
        let resolution = Resolution::Upstream("bonjour".to_string());
        assert_eq!(resolution.text(), "bonjour");
        assert_eq!(resolution.source(), ResolutionSource::Upstream);
        assert_eq!(resolution.into_text(), "bonjour");
    }
}
