//! 内存缓存后端
//!
//! Redis 不可用时的替代实现。不做过期处理，`ping` 始终返回 `false`
//! 以表明这不是真正的后端存储。

use std::time::Duration;

use dashmap::DashMap;

use super::{CacheBackend, CacheStore};
use crate::error::CacheResult;

/// 内存缓存
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: &str, value: &str, _ttl: Duration) -> CacheResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn ping(&self) -> bool {
        false
    }

    // 子串匹配，而不是 glob
    fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().contains(pattern))
            .map(|entry| entry.key().clone())
            .collect())
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Memory
    }
}
