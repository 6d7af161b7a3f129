//! 定期清理任务
//!
//! 在独立的 tokio 定时器上调用 `cleanup()`，与请求处理解耦。清理只删除
//! 严格过期的条目，查找本身也会把过期条目视为未命中，因此两者交错执行是安全的。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::engine::CacheEngine;
use super::specialized::{DictionaryCache, TranslationCache};
use super::lock;

/// 可被定期清理的缓存
pub trait ExpirySweep: Send + 'static {
    /// 清理过期条目，返回删除数量
    fn sweep_expired(&mut self) -> usize;
}

impl<V: Clone + Send + 'static> ExpirySweep for CacheEngine<V> {
    fn sweep_expired(&mut self) -> usize {
        self.cleanup()
    }
}

impl ExpirySweep for TranslationCache {
    fn sweep_expired(&mut self) -> usize {
        self.engine_mut().cleanup()
    }
}

impl ExpirySweep for DictionaryCache {
    fn sweep_expired(&mut self) -> usize {
        self.engine_mut().cleanup()
    }
}

/// 启动定期清理任务，返回任务句柄（调用 `abort()` 可停止）
pub fn spawn_cleanup_task<C: ExpirySweep>(
    cache: Arc<Mutex<C>>,
    interval: Duration,
    name: &'static str,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // 第一次 tick 立即返回
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = lock(&cache).sweep_expired();
            tracing::debug!("[{}] 定期清理了 {} 个过期缓存项", name, removed);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let mut engine = CacheEngine::new(10, Duration::from_secs(3600)).unwrap();
        engine
            .set_with_ttl("short", "x".to_string(), Duration::from_millis(1))
            .unwrap();
        engine.set("long", "y".to_string()).unwrap();
        let cache = Arc::new(Mutex::new(engine));

        let handle = spawn_cleanup_task(Arc::clone(&cache), Duration::from_millis(10), "test");
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.abort();

        let mut guard = lock(&cache);
        assert_eq!(guard.len(), 1);
        assert!(guard.has("long"));
    }
}
