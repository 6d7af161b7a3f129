//! 持久化存储
//!
//! 以 JSON 值为单位的键值存储，对应浏览器扩展的本地存储区。
//! 记录键：
//!
//! - `words`: 单词记录列表
//! - `translations`: 单词 → 翻译
//! - `wordsaver_learning_stats`: 学习统计
//! - `wordsaver_review_reminders`: 提醒设置
//! - `wordsaver_last_reminder`: 上次提醒日期

pub mod file;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{WordSaverError, WordSaverResult};
use crate::learning::{LearningStats, ReminderSettings};
use crate::words::{WordBook, WordRecord};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const WORDS_KEY: &str = "words";
pub const TRANSLATIONS_KEY: &str = "translations";
pub const LEARNING_STATS_KEY: &str = "wordsaver_learning_stats";
pub const REMINDER_SETTINGS_KEY: &str = "wordsaver_review_reminders";
pub const LAST_REMINDER_KEY: &str = "wordsaver_last_reminder";

/// 键值存储
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键，不存在时返回 `None`
    async fn get(&self, key: &str) -> WordSaverResult<Option<Value>>;

    /// 写入键
    async fn set(&self, key: &str, value: Value) -> WordSaverResult<()>;

    /// 删除键
    async fn remove(&self, key: &str) -> WordSaverResult<()>;
}

/// 读取并反序列化，不存在时返回默认值
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> WordSaverResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| WordSaverError::SerializationError(format!("记录 {} 格式无效: {}", key, e))),
    }
}

/// 序列化并写入
pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> WordSaverResult<()>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(key, value).await
}

/// 读取单词本
pub async fn load_word_book(store: &dyn KeyValueStore) -> WordSaverResult<WordBook> {
    let words: Vec<WordRecord> = load_json(store, WORDS_KEY).await?;
    let translations: BTreeMap<String, String> = load_json(store, TRANSLATIONS_KEY).await?;
    Ok(WordBook::from_parts(words, translations))
}

/// 写入单词本（翻译映射先于单词列表）
pub async fn save_word_book(store: &dyn KeyValueStore, book: &WordBook) -> WordSaverResult<()> {
    save_json(store, TRANSLATIONS_KEY, book.translations()).await?;
    save_json(store, WORDS_KEY, book.words()).await
}

pub async fn load_learning_stats(store: &dyn KeyValueStore) -> WordSaverResult<LearningStats> {
    load_json(store, LEARNING_STATS_KEY).await
}

pub async fn save_learning_stats(store: &dyn KeyValueStore, stats: &LearningStats) -> WordSaverResult<()> {
    save_json(store, LEARNING_STATS_KEY, stats).await
}

pub async fn load_reminder_settings(store: &dyn KeyValueStore) -> WordSaverResult<ReminderSettings> {
    load_json(store, REMINDER_SETTINGS_KEY).await
}

pub async fn save_reminder_settings(store: &dyn KeyValueStore, settings: &ReminderSettings) -> WordSaverResult<()> {
    save_json(store, REMINDER_SETTINGS_KEY, settings).await
}

pub async fn load_last_reminder(store: &dyn KeyValueStore) -> WordSaverResult<Option<NaiveDate>> {
    load_json(store, LAST_REMINDER_KEY).await
}

pub async fn save_last_reminder(store: &dyn KeyValueStore, date: NaiveDate) -> WordSaverResult<()> {
    save_json(store, LAST_REMINDER_KEY, &date).await
}
