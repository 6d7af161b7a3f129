//! 缓存引擎集成测试
//!
//! 测试容量、LRU 驱逐、TTL 过期和定期清理

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use wordsaver::cache::{generate_key, spawn_cleanup_task, CacheEngine, TranslationCache};
use wordsaver::error::WordSaverError;

/// 测试容量不变式
#[test]
fn test_size_never_exceeds_capacity() {
    let mut cache = CacheEngine::new(5, Duration::from_secs(60)).unwrap();

    for i in 0..50 {
        cache.set(format!("key-{}", i % 17), i).unwrap();
        assert!(cache.len() <= 5, "size {} exceeded capacity after set {}", cache.len(), i);
    }

    assert_eq!(cache.stats().size, 5);
    println!("✅ Capacity invariant test passed - {} evictions", cache.stats().evictions);
}

/// 测试 LRU 驱逐顺序
#[test]
fn test_lru_evicts_least_recently_used() {
    let mut cache = CacheEngine::new(2, Duration::from_secs(60)).unwrap();
    cache.set("a", 1).unwrap();
    cache.set("b", 2).unwrap();
    assert_eq!(cache.get("a"), Some(1));
    cache.set("c", 3).unwrap();

    assert!(cache.has("a"));
    assert!(!cache.has("b"));
    assert!(cache.has("c"));
    assert_eq!(cache.stats().evictions, 1);

    println!("✅ LRU eviction test passed");
}

/// 测试 TTL 过期
#[tokio::test]
async fn test_ttl_expiry_counts_as_miss() {
    let mut cache = CacheEngine::new(10, Duration::from_secs(60)).unwrap();
    cache.set_with_ttl("k", "v".to_string(), Duration::from_millis(1)).unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(cache.get("k"), None);
    let stats = cache.stats();
    assert_eq!(stats.miss_count, 1);
    assert_eq!(stats.hit_count, 0);
    assert_eq!(stats.size, 0);

    println!("✅ TTL expiry test passed");
}

/// 测试非法 TTL
#[test]
fn test_zero_ttl_is_invalid() {
    let mut cache: CacheEngine<i32> = CacheEngine::new(10, Duration::from_secs(60)).unwrap();
    assert!(matches!(
        cache.set_with_ttl("k", 1, Duration::ZERO),
        Err(WordSaverError::InvalidArgument(_))
    ));
    assert!(cache.is_empty());

    assert!(CacheEngine::<i32>::new(10, Duration::ZERO).is_err());
    assert!(CacheEngine::<i32>::new(0, Duration::from_secs(1)).is_err());
}

/// 测试清理幂等性
#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let mut cache = CacheEngine::new(10, Duration::from_secs(60)).unwrap();
    cache.set_with_ttl("short-1", 1, Duration::from_millis(1)).unwrap();
    cache.set_with_ttl("short-2", 2, Duration::from_millis(1)).unwrap();
    cache.set("long", 3).unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(cache.cleanup(), 2);
    assert_eq!(cache.cleanup(), 0);
    assert_eq!(cache.keys(), vec!["long".to_string()]);

    println!("✅ Cleanup idempotency test passed");
}

/// 测试空缓存上的操作
#[test]
fn test_empty_cache_operations_are_plain_misses() {
    let mut cache: CacheEngine<String> = CacheEngine::new(3, Duration::from_secs(60)).unwrap();
    assert_eq!(cache.get("missing"), None);
    assert!(!cache.has("missing"));
    cache.delete("missing");
    assert!(!cache.evict_lru());

    let stats = cache.stats();
    assert_eq!(stats.miss_count, 1);
    assert_eq!(stats.hit_rate, 0.0);
}

/// 测试键规范化
#[test]
fn test_key_canonicalization() {
    let mixed = generate_key("translation", &json!({"word": "Hello", "targetLang": "zh-CN"})).unwrap();
    let lower = generate_key("translation", &json!({"targetLang": "zh-CN", "word": "hello"})).unwrap();
    assert_ne!(mixed, lower);

    let mut cache = TranslationCache::new();
    cache.set_translation("Hello", "zh-CN", "你好").unwrap();
    assert_eq!(cache.get_translation("hello", "zh-CN").unwrap().as_deref(), Some("你好"));
    assert_eq!(cache.stats().size, 1);
}

/// 测试统计与清空
#[test]
fn test_stats_and_clear() {
    let mut cache = CacheEngine::new(10, Duration::from_secs(60)).unwrap();
    cache.set("a", 1).unwrap();
    cache.get("a");
    cache.get("a");
    cache.get("b");

    let stats = cache.stats();
    assert_eq!(stats.hit_count, 2);
    assert_eq!(stats.miss_count, 1);
    assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.hit_rate_display(), "66.67%");
    assert_eq!(cache.peek_entry("a").unwrap().access_count, 3);

    cache.clear();
    let stats = cache.stats();
    assert_eq!((stats.size, stats.hit_count, stats.miss_count), (0, 0, 0));
}

/// 测试定期清理任务
#[tokio::test]
async fn test_periodic_sweep_removes_expired_entries() {
    let cache = Arc::new(Mutex::new(CacheEngine::new(10, Duration::from_secs(60)).unwrap()));
    cache
        .lock()
        .unwrap()
        .set_with_ttl("short", 1, Duration::from_millis(1))
        .unwrap();
    cache.lock().unwrap().set("long", 2).unwrap();

    let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(10), "test");
    tokio::time::sleep(Duration::from_millis(80)).await;
    handle.abort();

    let guard = cache.lock().unwrap();
    assert_eq!(guard.len(), 1);
    assert!(guard.peek_entry("long").is_some());

    println!("✅ Periodic sweep test passed");
}
