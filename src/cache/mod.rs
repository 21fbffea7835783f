//! 翻译缓存
//!
//! 两种可互换的后端（Redis 与内存）实现同一个 [`CacheStore`] 接口，
//! 处理器只依赖该接口，不关心当前启用的是哪一种后端。

pub mod key;
pub mod memory;
pub mod redis_store;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::env::{self, EnvResult, EnvVar};
use crate::error::CacheResult;

pub use key::{cache_key, KEY_PREFIX};
pub use memory::MemoryCache;
pub use redis_store::{RedisCache, RedisCacheConfig};

/// 缓存后端接口
///
/// 实现必须允许多个请求并发读写。
pub trait CacheStore: Send + Sync {
    /// 读取缓存值
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// 写入缓存值，`ttl` 原样交给后端处理
    fn put(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// 后端是否为可用的真实存储
    fn ping(&self) -> bool;

    /// 列出匹配的键，仅用于估算缓存大小
    fn keys(&self, pattern: &str) -> CacheResult<Vec<String>>;

    /// 当前后端类型
    fn backend(&self) -> CacheBackend;
}

/// 缓存后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Redis => "redis",
            CacheBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// 期望的后端；Redis 探测失败时仍会退回内存
    pub backend: CacheBackend,
    pub redis: RedisCacheConfig,
    /// 写入条目的过期时间
    pub ttl: Duration,
}

impl CacheConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        let backend = match env::cache::Backend::get()?.as_str() {
            "memory" => CacheBackend::Memory,
            _ => CacheBackend::Redis,
        };

        Ok(Self {
            backend,
            redis: RedisCacheConfig::from_env()?,
            ttl: env::cache::Ttl::get()?,
        })
    }

    /// 仅使用内存后端的配置
    pub fn memory(ttl: Duration) -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis: RedisCacheConfig::default(),
            ttl,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis: RedisCacheConfig::default(),
            ttl: Duration::from_secs(3600),
        }
    }
}

/// 根据启动时的连通性探测选择缓存后端
///
/// Redis 探测失败后在整个进程生命周期内使用内存缓存，不再重连。
/// 探测是阻塞调用，异步上下文中应放进 `spawn_blocking`。
pub fn connect_cache(config: &CacheConfig) -> Arc<dyn CacheStore> {
    if config.backend == CacheBackend::Memory {
        tracing::info!("使用内存缓存");
        return Arc::new(MemoryCache::new());
    }

    match RedisCache::new(config.redis.clone()).and_then(|cache| {
        cache.test_connection()?;
        Ok(cache)
    }) {
        Ok(cache) => {
            tracing::info!(url = %config.redis.url(), "Redis 缓存连接成功");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!(
                url = %config.redis.url(),
                error = %e,
                "Redis 连接失败，使用内存缓存"
            );
            Arc::new(MemoryCache::new())
        }
    }
}
