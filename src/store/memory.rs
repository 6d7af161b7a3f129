//! 内存存储

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::KeyValueStore;
use crate::cache::lock;
use crate::error::{helpers, WordSaverResult};

/// 进程内键值存储，可模拟读写失败
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的读取全部失败
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// 之后的写入全部失败
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.data).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.data).is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> WordSaverResult<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(helpers::storage_failure(format!("读取 {} 失败", key)));
        }
        Ok(lock(&self.data).get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> WordSaverResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(helpers::storage_failure(format!("写入 {} 失败", key)));
        }
        lock(&self.data).insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> WordSaverResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(helpers::storage_failure(format!("删除 {} 失败", key)));
        }
        lock(&self.data).remove(key);
        Ok(())
    }
}
