//! 上游翻译接口调用
//!
//! GET `{api_url}?q=...&langpair=src|dst`，响应中取 `responseData.translatedText`。

use serde::Deserialize;
use thiserror::Error;

use super::TranslatorConfig;
use crate::metrics::ErrorCategory;

/// 上游在配额用尽或语言对无效时返回的提示文本
pub const ERROR_SENTINEL: &str = "PLEASE SELECT";

/// 上游调用失败原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// 译文中包含错误提示
    #[error("upstream rejected the request")]
    Rejected,
}

impl UpstreamFailure {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UpstreamFailure::Network(_) => ErrorCategory::UpstreamNetwork,
            UpstreamFailure::Timeout => ErrorCategory::UpstreamTimeout,
            UpstreamFailure::Status(_) => ErrorCategory::UpstreamStatus,
            UpstreamFailure::Malformed(_) => ErrorCategory::UpstreamMalformed,
            UpstreamFailure::Rejected => ErrorCategory::UpstreamRejected,
        }
    }
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamFailure::Timeout
        } else if err.is_decode() {
            UpstreamFailure::Malformed(err.to_string())
        } else {
            UpstreamFailure::Network(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// 调用上游接口，不重试
pub(crate) async fn fetch(
    client: &reqwest::Client,
    config: &TranslatorConfig,
    text: &str,
    target_lang: &str,
) -> Result<String, UpstreamFailure> {
    let langpair = format!("{}|{}", config.source_lang, target_lang);
    let response = client
        .get(&config.api_url)
        .query(&[("q", text), ("langpair", langpair.as_str())])
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(UpstreamFailure::Status(status.as_u16()));
    }

    let body: UpstreamResponse = response.json().await?;
    let translated = body
        .response_data
        .and_then(|data| data.translated_text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| UpstreamFailure::Malformed("missing responseData.translatedText".into()))?;

    if translated.contains(ERROR_SENTINEL) {
        return Err(UpstreamFailure::Rejected);
    }

    Ok(translated)
}
