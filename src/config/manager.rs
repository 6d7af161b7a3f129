//! 配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::cache::CacheConfig;
use crate::env::EnvVar;
use crate::error::{helpers, WordSaverResult};

/// WordSaver 配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WordSaverConfig {
    // 语言配置
    pub target_lang: String,
    pub source_lang: String,

    // 缓存配置
    pub translation_cache_size: usize,
    pub translation_cache_ttl_secs: u64,
    pub translation_cleanup_interval_secs: u64,
    pub dictionary_cache_size: usize,
    pub dictionary_cache_ttl_secs: u64,
    pub dictionary_cleanup_interval_secs: u64,

    // 翻译服务配置
    pub provider_timeout_ms: u64,
    pub enrich_with_definition: bool,

    // 存储配置
    pub data_file: String,

    // Web 配置
    pub bind_addr: String,
    pub port: u16,
}

impl Default for WordSaverConfig {
    fn default() -> Self {
        Self {
            target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),

            translation_cache_size: constants::TRANSLATION_CACHE_SIZE,
            translation_cache_ttl_secs: constants::TRANSLATION_CACHE_TTL.as_secs(),
            translation_cleanup_interval_secs: constants::TRANSLATION_CLEANUP_INTERVAL.as_secs(),
            dictionary_cache_size: constants::DICTIONARY_CACHE_SIZE,
            dictionary_cache_ttl_secs: constants::DICTIONARY_CACHE_TTL.as_secs(),
            dictionary_cleanup_interval_secs: constants::DICTIONARY_CLEANUP_INTERVAL.as_secs(),

            provider_timeout_ms: constants::DEFAULT_PROVIDER_TIMEOUT.as_millis() as u64,
            enrich_with_definition: true,

            data_file: constants::DEFAULT_DATA_FILE.to_string(),

            bind_addr: constants::DEFAULT_BIND_ADDR.to_string(),
            port: constants::DEFAULT_PORT,
        }
    }
}

impl WordSaverConfig {
    /// 验证配置
    pub fn validate(&self) -> WordSaverResult<()> {
        if self.target_lang.trim().is_empty() {
            return Err(helpers::config_error("目标语言不能为空"));
        }

        if self.translation_cache_size == 0 || self.dictionary_cache_size == 0 {
            return Err(helpers::config_error("缓存容量必须大于0"));
        }

        if self.translation_cache_ttl_secs == 0 || self.dictionary_cache_ttl_secs == 0 {
            return Err(helpers::config_error("缓存TTL必须大于0"));
        }

        if self.translation_cleanup_interval_secs == 0 || self.dictionary_cleanup_interval_secs == 0 {
            return Err(helpers::config_error("清理间隔必须大于0"));
        }

        if self.provider_timeout_ms == 0 {
            return Err(helpers::config_error("翻译超时必须大于0"));
        }

        if self.data_file.trim().is_empty() {
            return Err(helpers::config_error("数据文件路径不能为空"));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（只覆盖显式设置的变量）
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, storage, translation, web};

        if let Some(value) = translation::TargetLang::get_if_set() {
            apply(value, &mut self.target_lang);
        }

        if let Some(value) = translation::SourceLang::get_if_set() {
            apply(value, &mut self.source_lang);
        }

        if let Some(value) = translation::ProviderTimeout::get_if_set() {
            if let Some(timeout) = accept(value) {
                self.provider_timeout_ms = timeout.as_millis() as u64;
            }
        }

        if let Some(value) = translation::EnrichDefinition::get_if_set() {
            apply(value, &mut self.enrich_with_definition);
        }

        if let Some(value) = cache::TranslationSize::get_if_set() {
            apply(value, &mut self.translation_cache_size);
        }

        if let Some(value) = cache::TranslationTtl::get_if_set() {
            if let Some(ttl) = accept(value) {
                self.translation_cache_ttl_secs = ttl.as_secs();
            }
        }

        if let Some(value) = cache::DictionarySize::get_if_set() {
            apply(value, &mut self.dictionary_cache_size);
        }

        if let Some(value) = cache::DictionaryTtl::get_if_set() {
            if let Some(ttl) = accept(value) {
                self.dictionary_cache_ttl_secs = ttl.as_secs();
            }
        }

        if let Some(value) = storage::DataFile::get_if_set() {
            apply(value, &mut self.data_file);
        }

        if let Some(value) = web::BindAddress::get_if_set() {
            apply(value, &mut self.bind_addr);
        }

        if let Some(value) = web::Port::get_if_set() {
            apply(value, &mut self.port);
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// 翻译缓存配置
    pub fn translation_cache(&self) -> CacheConfig {
        CacheConfig {
            max_size: self.translation_cache_size,
            default_ttl: Duration::from_secs(self.translation_cache_ttl_secs),
            cleanup_interval: Duration::from_secs(self.translation_cleanup_interval_secs),
        }
    }

    /// 词典缓存配置
    pub fn dictionary_cache(&self) -> CacheConfig {
        CacheConfig {
            max_size: self.dictionary_cache_size,
            default_ttl: Duration::from_secs(self.dictionary_cache_ttl_secs),
            cleanup_interval: Duration::from_secs(self.dictionary_cleanup_interval_secs),
        }
    }

    /// 展开 `~` 后的数据文件路径
    pub fn data_file_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_file).as_ref())
    }
}

fn apply<T>(value: crate::env::EnvResult<T>, target: &mut T) {
    if let Some(value) = accept(value) {
        *target = value;
    }
}

fn accept<T>(value: crate::env::EnvResult<T>) -> Option<T> {
    match value {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("忽略无效的环境变量: {}", e);
            None
        }
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: WordSaverConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> WordSaverResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定文件创建配置管理器（不读取 .env）
    pub fn from_file(path: &str) -> WordSaverResult<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &WordSaverConfig {
        &self.config
    }

    pub fn into_config(self) -> WordSaverConfig {
        self.config
    }

    /// 从文件加载配置
    fn load_config() -> WordSaverResult<WordSaverConfig> {
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(WordSaverConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> WordSaverResult<WordSaverConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| helpers::config_error(format!("读取配置文件失败: {}", e)))?;

        if path.ends_with(".toml") {
            toml::from_str(&content)
                .map_err(|e| helpers::config_error(format!("解析TOML配置失败: {}", e)))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| helpers::config_error(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> WordSaverResult<()> {
        let config = WordSaverConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| helpers::config_error(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| helpers::config_error(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
