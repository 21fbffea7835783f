//! 缓存键生成
//!
//! `translation:{lang}:{hash}`，哈希取 BLAKE3 摘要的前 8 字节。
//! 不同文本的前 64 位摘要相同时会共享同一个缓存槽位，这是已知限制。

/// 所有翻译缓存键的前缀
pub const KEY_PREFIX: &str = "translation:";

/// 生成缓存键
pub fn cache_key(text: &str, target_lang: &str) -> String {
    let digest = blake3::hash(text.as_bytes());
    let mut hash = String::with_capacity(16);
    for byte in &digest.as_bytes()[..8] {
        hash.push_str(&format!("{:02x}", byte));
    }
    format!("{}{}:{}", KEY_PREFIX, target_lang, hash)
}
