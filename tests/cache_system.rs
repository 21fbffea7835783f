//! 缓存系统集成测试
//!
//! 测试缓存键约定、后端选择以及处理器与缓存之间的交互

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{TestApp, TEST_TTL};
use translation_api::cache::{
    cache_key, connect_cache, CacheBackend, CacheConfig, CacheStore, MemoryCache,
    RedisCacheConfig,
};

/// 预先写入的缓存值应被处理器直接返回
#[tokio::test]
async fn test_handler_reads_entries_under_derived_key() {
    let cache = Arc::new(MemoryCache::new());
    cache
        .put(&cache_key("hello", "fr"), "coucou", TEST_TTL)
        .unwrap();

    let app = TestApp::with_cache(cache);
    let body = app.translate("hello", "fr").await.json();

    assert_eq!(body["translated_text"], "coucou");
    assert_eq!(body["cached"], true);
}

/// 处理器写入的键遵循 translation:{lang}:{hash} 格式
#[tokio::test]
async fn test_handler_writes_entries_under_derived_key() {
    let cache = Arc::new(MemoryCache::new());
    let app = TestApp::with_cache(Arc::clone(&cache) as Arc<dyn CacheStore>);

    app.translate("how are you", "es").await;

    assert_eq!(
        cache.get(&cache_key("how are you", "es")).unwrap().as_deref(),
        Some("cómo estás")
    );
    let keys = cache.keys("translation:es:").unwrap();
    assert_eq!(keys.len(), 1);
}

/// 空字符串缓存值视为未命中并被重新填充
#[tokio::test]
async fn test_empty_cached_value_is_refilled() {
    let cache = Arc::new(MemoryCache::new());
    cache.put(&cache_key("hello", "de"), "", TEST_TTL).unwrap();

    let app = TestApp::with_cache(Arc::clone(&cache) as Arc<dyn CacheStore>);
    let body = app.translate("hello", "de").await.json();

    assert_eq!(body["cached"], false);
    assert_eq!(body["translated_text"], "hallo");
    assert_eq!(
        cache.get(&cache_key("hello", "de")).unwrap().as_deref(),
        Some("hallo")
    );
}

/// Redis 不可达时永久退回内存缓存
#[tokio::test]
async fn test_factory_falls_back_to_memory() {
    let config = CacheConfig {
        backend: CacheBackend::Redis,
        redis: RedisCacheConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout: Duration::from_millis(200),
            io_timeout: Duration::from_millis(200),
        },
        ttl: TEST_TTL,
    };

    let cache = tokio::task::spawn_blocking(move || connect_cache(&config))
        .await
        .unwrap();
    assert_eq!(cache.backend(), CacheBackend::Memory);

    let app = TestApp::with_cache(cache);
    let health = app.get("/health").await.json();
    assert_eq!(health["redis_connected"], false);

    let first = app.translate("hello world", "fr").await.json();
    let second = app.translate("hello world", "fr").await.json();
    assert_eq!(first["translated_text"], "bonjour le monde");
    assert_eq!(second["cached"], true);
}

#[test]
fn test_memory_config_never_probes() {
    let cache = connect_cache(&CacheConfig::memory(TEST_TTL));
    assert_eq!(cache.backend(), CacheBackend::Memory);
    assert!(cache.keys("translation:").unwrap().is_empty());
}

#[test]
fn test_cache_key_contract() {
    let key = cache_key("hello world", "fr");
    assert!(key.starts_with("translation:fr:"));
    assert_eq!(key, cache_key("hello world", "fr"));
    assert_ne!(key, cache_key("hello world", "es"));
    assert_ne!(key, cache_key("hello  world", "fr"));
}
