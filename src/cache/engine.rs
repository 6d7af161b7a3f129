//! 通用缓存引擎
//!
//! 带容量上限（LRU 驱逐）和条目级 TTL 的键值缓存。过期采用惰性检查：
//! `get`/`has` 遇到过期条目时直接删除并按未命中处理，`cleanup` 可由定时任务调用。

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{helpers, WordSaverResult};

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存条目
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// 读取次数，写入时为 1
    pub access_count: u64,
}

/// 缓存配置
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub max_size: usize,
    pub default_ttl: Duration,
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            default_ttl: Duration::from_secs(24 * 60 * 60),
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    /// 命中率，取值 [0, 1]；尚无请求时为 0
    pub hit_rate: f64,
    pub evictions: u64,
}

impl CacheStats {
    /// 百分比形式的命中率，例如 `"66.67%"`
    pub fn hit_rate_display(&self) -> String {
        format!("{:.2}%", self.hit_rate * 100.0)
    }
}

/// 最近访问标记：时间相同时按访问序号区分先后
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Recency {
    at: DateTime<Utc>,
    seq: u64,
}

/// 缓存引擎
#[derive(Debug)]
pub struct CacheEngine<V> {
    entries: HashMap<String, CacheEntry<V>>,
    recency: HashMap<String, Recency>,
    max_size: usize,
    default_ttl: Duration,
    hit_count: u64,
    miss_count: u64,
    evictions: u64,
    next_seq: u64,
}

// ============================================================================
// 实现
// ============================================================================

impl<V> CacheEntry<V> {
    /// 检查条目在给定时刻是否已过期
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl<V: Clone> CacheEngine<V> {
    /// 创建新的缓存引擎
    pub fn new(max_size: usize, default_ttl: Duration) -> WordSaverResult<Self> {
        if max_size == 0 {
            return Err(helpers::invalid_argument("缓存容量必须大于0"));
        }
        ttl_to_chrono(default_ttl)?;

        Ok(Self {
            entries: HashMap::new(),
            recency: HashMap::new(),
            max_size,
            default_ttl,
            hit_count: 0,
            miss_count: 0,
            evictions: 0,
            next_seq: 0,
        })
    }

    /// 使用配置创建缓存引擎
    pub fn with_config(config: &CacheConfig) -> WordSaverResult<Self> {
        Self::new(config.max_size, config.default_ttl)
    }

    /// 使用默认 TTL 写入
    pub fn set(&mut self, key: impl Into<String>, value: V) -> WordSaverResult<()> {
        let ttl = self.default_ttl;
        self.set_with_ttl(key, value, ttl)
    }

    /// 写入缓存条目
    ///
    /// 新键且缓存已满时先驱逐一个最久未访问的条目。覆盖已有键会重置
    /// 过期时间和访问计数。TTL 为 0 时返回 `InvalidArgument`。
    pub fn set_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) -> WordSaverResult<()> {
        let ttl = ttl_to_chrono(ttl)?;
        let key = key.into();
        let now = Utc::now();

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_size {
                if !self.evict_lru() {
                    break;
                }
            }
        }

        let entry = CacheEntry {
            value,
            created_at: now,
            expires_at: now + ttl,
            access_count: 1,
        };
        let mark = self.mark(now);
        self.entries.insert(key.clone(), entry);
        self.recency.insert(key, mark);

        Ok(())
    }

    /// 读取缓存条目
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Utc::now();

        let expired = match self.entries.get(key) {
            None => {
                self.miss_count += 1;
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.delete(key);
            self.miss_count += 1;
            return None;
        }

        let mark = self.mark(now);
        self.recency.insert(key.to_string(), mark);
        self.hit_count += 1;

        let entry = self.entries.get_mut(key)?;
        entry.access_count += 1;
        Some(entry.value.clone())
    }

    /// 检查键是否存在且未过期，不影响命中统计和访问顺序
    pub fn has(&mut self, key: &str) -> bool {
        let now = Utc::now();
        let expired = match self.entries.get(key) {
            None => return false,
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.delete(key);
        }
        !expired
    }

    /// 查看条目元数据，不影响统计
    pub fn peek_entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// 删除缓存条目（幂等）
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
        self.recency.remove(key);
    }

    /// 清理过期条目，返回删除数量
    pub fn cleanup(&mut self) -> usize {
        let now = Utc::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at < now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.delete(key);
        }

        if !expired.is_empty() {
            tracing::debug!("清理了 {} 个过期缓存项", expired.len());
        }
        expired.len()
    }

    /// LRU驱逐算法，返回是否驱逐了条目
    pub fn evict_lru(&mut self) -> bool {
        let oldest_key = self
            .recency
            .iter()
            .min_by_key(|(_, mark)| **mark)
            .map(|(key, _)| key.clone());

        match oldest_key {
            Some(key) => {
                self.delete(&key);
                self.evictions += 1;
                tracing::debug!("LRU驱逐缓存项: {}", key);
                true
            }
            None => false,
        }
    }

    /// 清空缓存并重置统计
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.reset_stats();
    }

    /// 重置统计信息
    pub fn reset_stats(&mut self) {
        self.hit_count = 0;
        self.miss_count = 0;
        self.evictions = 0;
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        let total = self.hit_count + self.miss_count;
        let hit_rate = if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        };

        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            hit_count: self.hit_count,
            miss_count: self.miss_count,
            hit_rate,
            evictions: self.evictions,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 获取所有缓存键
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn mark(&mut self, at: DateTime<Utc>) -> Recency {
        self.next_seq += 1;
        Recency { at, seq: self.next_seq }
    }
}

impl<V: Clone + Serialize> CacheEngine<V> {
    /// 估算内存占用（字节）：键和序列化后的值按 UTF-16 计算，外加每条 64 字节元数据
    pub fn memory_usage(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let value_len = serde_json::to_string(&entry.value)
                    .map(|s| s.chars().count())
                    .unwrap_or(0);
                key.chars().count() * 2 + value_len * 2 + 64
            })
            .sum()
    }
}

/// 把内存占用格式化为 B / KB / MB
pub fn format_memory_usage(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn ttl_to_chrono(ttl: Duration) -> WordSaverResult<chrono::Duration> {
    if ttl.is_zero() {
        return Err(helpers::invalid_argument("TTL必须大于0"));
    }
    chrono::Duration::from_std(ttl)
        .map_err(|_| helpers::invalid_argument(format!("TTL超出范围: {:?}", ttl)))
}
