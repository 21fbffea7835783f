//! 统一错误处理
//!
//! 缓存后端错误与 HTTP 边界错误

use thiserror::Error;

/// 缓存后端错误
#[derive(Error, Debug)]
pub enum CacheError {
    /// 无法建立连接
    #[error("cache connection failed: {0}")]
    Connection(String),

    /// 命令执行失败
    #[error("cache command failed: {0}")]
    Command(String),

    /// 阻塞任务未能完成
    #[error("cache task failed: {0}")]
    Task(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
            CacheError::Connection(err.to_string())
        } else {
            CacheError::Command(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        CacheError::Task(err.to_string())
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

/// HTTP 处理器边界错误
///
/// 客户端输入错误映射为 400，其余统一映射为 500 并隐藏细节。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No JSON data provided")]
    MissingBody,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Internal server error")]
    Internal(#[from] CacheError),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            ApiError::MissingBody | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为客户端错误
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = axum::Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

/// 服务启动与运行错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Startup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
