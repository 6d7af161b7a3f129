//! # WordSaver Library
//!
//! 悬停翻译缓存与记忆曲线复习调度，为 WordSaver 浏览器扩展提供后台逻辑。
//!
//! ## 模块组织
//!
//! - `error` - 统一错误类型
//! - `env` - 类型化环境变量
//! - `config` - 配置加载与验证
//! - `cache` - LRU + TTL 缓存引擎、翻译缓存与词典缓存
//! - `learning` - 记忆曲线调度、学习统计、复习提醒
//! - `words` - 单词记录、单词本、CSV 导入导出
//! - `store` - 持久化键值存储
//! - `translation` - 翻译服务提供者链与翻译流水线
//! - `background` - 消息契约与后台服务
//! - `web` - 本地 HTTP 服务（可选）

pub mod background;
pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod learning;
pub mod store;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;
pub mod words;

// Re-export commonly used items for convenience
pub use background::{BackgroundService, Request, Response};
pub use cache::{CacheEngine, CacheStats, DictionaryCache, TranslationCache};
pub use config::{ConfigManager, WordSaverConfig};
pub use error::{WordSaverError, WordSaverResult};
pub use learning::{Difficulty, LearningStats, MemoryCurve, ReviewUrgency};
pub use words::{WordBook, WordRecord, WordSource};
