//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量管理

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "TRANSLATION_API_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 上游翻译接口启用状态
    pub struct UpstreamEnabled;
    impl EnvVar<bool> for UpstreamEnabled {
        const NAME: &'static str = "TRANSLATION_UPSTREAM_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str =
            "Call the upstream translation API before falling back to the phrase table";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 默认目标语言
    pub struct TargetLang;
    impl EnvVar<String> for TargetLang {
        const NAME: &'static str = "DEFAULT_TARGET_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("fr".to_string()),
            }
        }
        const DESCRIPTION: &'static str =
            "Target language used when a request omits target_lang (ISO 639-1 code)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang(value, Self::NAME)
        }
    }

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "TRANSLATION_SOURCE_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Source language sent in the upstream langpair";

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang(value, Self::NAME)
        }
    }

    /// API URL
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "TRANSLATION_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("https://api.mymemory.translated.net/get".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Upstream translation API endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 上游请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "TRANSLATION_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(5));
        const DESCRIPTION: &'static str = "Upstream translation request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 60)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存后端选择
    pub struct Backend;
    impl EnvVar<String> for Backend {
        const NAME: &'static str = "CACHE_BACKEND";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("redis".to_string()),
            }
        }
        const DESCRIPTION: &'static str =
            "Cache backend: redis (probe at startup, fall back to memory) or memory";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                "redis" | "memory" => Ok(value.trim().to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid backend '{}'. Use: redis, memory", value),
                }),
            }
        }
    }

    /// Redis 主机
    pub struct RedisHost;
    impl EnvVar<String> for RedisHost {
        const NAME: &'static str = "REDIS_HOST";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("localhost".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Redis host name";

        fn parse(value: &str) -> EnvResult<String> {
            let host = value.trim();
            if host.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Host cannot be empty".to_string(),
                });
            }
            Ok(host.to_string())
        }
    }

    /// Redis 端口
    pub struct RedisPort;
    impl EnvVar<u16> for RedisPort {
        const NAME: &'static str = "REDIS_PORT";
        const DEFAULT: Option<u16> = Some(6379);
        const DESCRIPTION: &'static str = "Redis port";

        fn parse(value: &str) -> EnvResult<u16> {
            parse_port(value, Self::NAME)
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(3600));
        const DESCRIPTION: &'static str = "Cache entry time-to-live in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_seconds(value, Self::NAME, 1, 86400 * 7)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "TRANSLATION_API_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("0.0.0.0".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "TRANSLATION_API_PORT";
        const DEFAULT: Option<u16> = Some(5000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            parse_port(value, Self::NAME)
        }
    }
}

// 辅助函数

fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off",
                value
            ),
        }),
    }
}

fn parse_lang(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim().to_lowercase();
    if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Language code must be 2 letters (ISO 639-1)".to_string(),
        });
    }
    Ok(lang)
}

fn parse_port(value: &str, var_name: &str) -> EnvResult<u16> {
    let port: u16 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid port number (1-65535)".to_string(),
    })?;

    if port == 0 {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }

    Ok(port)
}

fn parse_seconds(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<Duration> {
    let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid number of seconds".to_string(),
    })?;

    if seconds < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", seconds, min),
        });
    }

    if seconds > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", seconds, max),
        });
    }

    Ok(Duration::from_secs(seconds))
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    push_doc(&mut docs, core::LogLevel::NAME, core::LogLevel::DESCRIPTION, "info");

    docs.push_str("\n## Translation Configuration\n\n");
    push_doc(
        &mut docs,
        translation::UpstreamEnabled::NAME,
        translation::UpstreamEnabled::DESCRIPTION,
        format!("{:?}", translation::UpstreamEnabled::DEFAULT),
    );
    push_doc(&mut docs, translation::TargetLang::NAME, translation::TargetLang::DESCRIPTION, "fr");
    push_doc(&mut docs, translation::SourceLang::NAME, translation::SourceLang::DESCRIPTION, "en");
    push_doc(
        &mut docs,
        translation::ApiUrl::NAME,
        translation::ApiUrl::DESCRIPTION,
        "https://api.mymemory.translated.net/get",
    );
    push_doc(
        &mut docs,
        translation::Timeout::NAME,
        translation::Timeout::DESCRIPTION,
        format!("{:?}", translation::Timeout::DEFAULT),
    );

    docs.push_str("\n## Cache Configuration\n\n");
    push_doc(&mut docs, cache::Backend::NAME, cache::Backend::DESCRIPTION, "redis");
    push_doc(&mut docs, cache::RedisHost::NAME, cache::RedisHost::DESCRIPTION, "localhost");
    push_doc(
        &mut docs,
        cache::RedisPort::NAME,
        cache::RedisPort::DESCRIPTION,
        format!("{:?}", cache::RedisPort::DEFAULT),
    );
    push_doc(
        &mut docs,
        cache::Ttl::NAME,
        cache::Ttl::DESCRIPTION,
        format!("{:?}", cache::Ttl::DEFAULT),
    );

    docs.push_str("\n## Web Server Configuration\n\n");
    push_doc(&mut docs, web::BindAddress::NAME, web::BindAddress::DESCRIPTION, "0.0.0.0");
    push_doc(
        &mut docs,
        web::Port::NAME,
        web::Port::DESCRIPTION,
        format!("{:?}", web::Port::DEFAULT),
    );

    docs
}

fn push_doc(docs: &mut String, name: &str, description: &str, default: impl fmt::Display) {
    docs.push_str(&format!("- `{}`: {} (default: {})\n", name, description, default));
}
