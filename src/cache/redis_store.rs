//! Redis 缓存后端
//!
//! 每次操作建立一条带超时的连接，并发安全由 Redis 自身保证。

use std::time::Duration;

use redis::{Client, Connection};

use super::{CacheBackend, CacheStore};
use crate::env::{self, EnvResult, EnvVar};
use crate::error::CacheResult;

/// Redis 缓存配置
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    pub host: String,
    pub port: u16,
    /// 建立连接的超时
    pub connect_timeout: Duration,
    /// 读写超时
    pub io_timeout: Duration,
}

impl RedisCacheConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            host: env::cache::RedisHost::get()?,
            port: env::cache::RedisPort::get()?,
            ..Self::default()
        })
    }

    /// 连接地址
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(5),
        }
    }
}

/// Redis 缓存客户端
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    config: RedisCacheConfig,
}

impl RedisCache {
    /// 创建新的 Redis 缓存实例，不会立即连接
    pub fn new(config: RedisCacheConfig) -> CacheResult<Self> {
        let client = Client::open(config.url().as_str())?;
        Ok(Self { client, config })
    }

    /// 测试 Redis 连接
    pub fn test_connection(&self) -> CacheResult<()> {
        let mut conn = self.connection()?;
        let _: String = redis::cmd("PING").query(&mut conn)?;
        Ok(())
    }

    fn connection(&self) -> CacheResult<Connection> {
        let conn = self
            .client
            .get_connection_with_timeout(self.config.connect_timeout)?;
        conn.set_read_timeout(Some(self.config.io_timeout))?;
        conn.set_write_timeout(Some(self.config.io_timeout))?;
        Ok(conn)
    }
}

impl CacheStore for RedisCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection()?;
        let cached: Option<String> = redis::cmd("GET").arg(key).query(&mut conn)?;
        Ok(cached)
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection()?;
        // SETEX 不接受 0 秒
        let seconds = ttl.as_secs().max(1);
        let _: () = redis::cmd("SETEX")
            .arg(key)
            .arg(seconds)
            .arg(value)
            .query(&mut conn)?;
        Ok(())
    }

    fn ping(&self) -> bool {
        match self.test_connection() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Redis PING 失败");
                false
            }
        }
    }

    fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.connection()?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{}*", pattern))
            .query(&mut conn)?;
        Ok(keys)
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Redis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_host_and_port() {
        let config = RedisCacheConfig {
            host: "redis.internal".to_string(),
            port: 6380,
            ..RedisCacheConfig::default()
        };
        assert_eq!(config.url(), "redis://redis.internal:6380/");
    }

    #[test]
    fn test_default_timeouts() {
        let config = RedisCacheConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.io_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_unreachable_server_reports_down() {
        let cache = RedisCache::new(RedisCacheConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout: Duration::from_millis(200),
            io_timeout: Duration::from_millis(200),
        })
        .unwrap();

        assert!(cache.test_connection().is_err());
        assert!(!cache.ping());
        assert!(cache.get("translation:fr:0").is_err());
    }
}
