// 集成测试公共模块
//
// 提供测试应用构建和请求辅助函数
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use translation_api::cache::{CacheStore, MemoryCache};
use translation_api::translation::{Translator, TranslatorConfig};
use translation_api::web::{create_router, AppState};

pub const TEST_TTL: Duration = Duration::from_secs(3600);

/// 测试应用
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

/// 一次请求的结果
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body should be JSON")
    }
}

impl TestApp {
    /// 内存缓存 + 不调用上游
    pub fn offline() -> Self {
        Self::with_parts(Arc::new(MemoryCache::new()), TranslatorConfig::offline())
    }

    /// 内存缓存 + 指定上游地址
    pub fn with_upstream(api_url: &str) -> Self {
        let config = TranslatorConfig {
            api_url: api_url.to_string(),
            timeout: Duration::from_secs(2),
            ..TranslatorConfig::default()
        };
        Self::with_parts(Arc::new(MemoryCache::new()), config)
    }

    pub fn with_cache(cache: Arc<dyn CacheStore>) -> Self {
        Self::with_parts(cache, TranslatorConfig::offline())
    }

    pub fn with_parts(cache: Arc<dyn CacheStore>, translator: TranslatorConfig) -> Self {
        let translator = Translator::new(translator).expect("HTTP client should build");
        let state = Arc::new(AppState::new(cache, translator, TEST_TTL, "fr"));
        let router = create_router(Arc::clone(&state));
        Self { state, router }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn translate(&self, text: &str, target_lang: &str) -> TestResponse {
        let body = serde_json::json!({ "text": text, "target_lang": target_lang }).to_string();
        self.post_json("/translate", &body).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
