//! 缓存模块
//!
//! - **engine**: 通用有界缓存引擎（LRU 驱逐 + TTL 过期）
//! - **key**: 规范化缓存键生成
//! - **specialized**: 翻译缓存与词典缓存
//! - **sweeper**: 定期清理任务

pub mod engine;
pub mod key;
pub mod specialized;
pub mod sweeper;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use engine::{format_memory_usage, CacheConfig, CacheEntry, CacheEngine, CacheStats};
pub use key::generate_key;
pub use specialized::{definition_key, translation_key, DictionaryCache, TranslationCache};
pub use sweeper::{spawn_cleanup_task, ExpirySweep};

/// 获取缓存锁；缓存状态在任何操作后都保持一致，锁中毒时继续使用内部数据
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
