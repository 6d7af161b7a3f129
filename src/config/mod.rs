//! 配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, WordSaverConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 语言设置
    pub const DEFAULT_TARGET_LANG: &str = "zh-CN";
    pub const DEFAULT_SOURCE_LANG: &str = "en";

    // 翻译缓存：500 条，7 天
    pub const TRANSLATION_CACHE_SIZE: usize = 500;
    pub const TRANSLATION_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    pub const TRANSLATION_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

    // 词典缓存：300 条，30 天
    pub const DICTIONARY_CACHE_SIZE: usize = 300;
    pub const DICTIONARY_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
    pub const DICTIONARY_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

    // 翻译服务
    pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);
    pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
    pub const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
    pub const REFERENCE_LINK_URL: &str = "https://translate.google.com/";

    // 存储
    pub const DEFAULT_DATA_FILE: &str = "~/.wordsaver/storage.json";

    // Web 服务
    pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 7081;

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "wordsaver.toml",
        ".wordsaver.toml",
        "~/.config/wordsaver/config.toml",
    ];
}
