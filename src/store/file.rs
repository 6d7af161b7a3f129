//! JSON 文件存储
//!
//! 全部记录保存在一个 JSON 对象文件中，首次访问时加载，
//! 每次写入先写临时文件再重命名。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::error::{helpers, WordSaverError, WordSaverResult};

/// 单文件 JSON 存储
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<Option<Map<String, Value>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> WordSaverResult<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("存储文件不存在，将新建: {}", self.path.display());
                return Ok(Map::new());
            }
            Err(e) => {
                return Err(helpers::storage_failure(format!(
                    "读取存储文件 {} 失败: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(WordSaverError::SerializationError(format!(
                "存储文件 {} 不是 JSON 对象",
                self.path.display()
            ))),
        }
    }

    async fn persist(&self, records: &Map<String, Value>) -> WordSaverResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("已写入存储文件: {}", self.path.display());
        Ok(())
    }

    /// 在已加载的记录上执行修改并落盘；落盘失败时内存状态不变
    async fn update<F>(&self, apply: F) -> WordSaverResult<()>
    where
        F: FnOnce(&mut Map<String, Value>) + Send,
    {
        let mut guard = self.records.lock().await;
        let mut records = match guard.as_ref() {
            Some(records) => records.clone(),
            None => self.load().await?,
        };

        apply(&mut records);
        self.persist(&records).await?;
        *guard = Some(records);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> WordSaverResult<Option<Value>> {
        let mut guard = self.records.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard.as_ref().and_then(|records| records.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: Value) -> WordSaverResult<()> {
        let key = key.to_string();
        self.update(move |records| {
            records.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> WordSaverResult<()> {
        self.update(|records| {
            records.remove(key);
        })
        .await
    }
}
