//! Web 服务器模块
//!
//! 提供文本翻译、健康检查和指标接口

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::error::ServerError;

/// Web 服务器
pub struct WebServer {
    config: AppConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 启动 Web 服务器，收到 Ctrl-C 后优雅退出
    pub async fn start(&self) -> Result<(), ServerError> {
        let app_state = Arc::new(AppState::from_config(&self.config).await?);
        let app = create_router(app_state);

        let listener = tokio::net::TcpListener::bind(self.config.web.listen_address())
            .await
            .map_err(ServerError::Bind)?;

        tracing::info!(
            "Translation API listening on http://{}",
            self.config.web.listen_address()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&app_state),
            middleware::track_request,
        ))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
