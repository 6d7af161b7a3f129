//! 翻译缓存与词典缓存
//!
//! 两者都是固定配置的 [`CacheEngine`]，键中的单词一律小写，
//! 保证 "Hello" 与 "hello" 命中同一条目。

use serde::Serialize;

use super::engine::{CacheConfig, CacheEngine, CacheStats};
use super::key::generate_key;
use crate::config::constants;
use crate::error::WordSaverResult;

const TRANSLATION_PREFIX: &str = "translation";
const DEFINITION_PREFIX: &str = "definition";

#[derive(Serialize)]
struct TranslationKey<'a> {
    word: String,
    #[serde(rename = "targetLang")]
    target_lang: &'a str,
}

/// 翻译缓存键
pub fn translation_key(word: &str, target_lang: &str) -> WordSaverResult<String> {
    generate_key(
        TRANSLATION_PREFIX,
        &TranslationKey {
            word: word.trim().to_lowercase(),
            target_lang,
        },
    )
}

/// 词典缓存键
pub fn definition_key(word: &str) -> WordSaverResult<String> {
    generate_key(DEFINITION_PREFIX, &word.trim().to_lowercase())
}

/// 翻译缓存（默认 500 条，7 天）
#[derive(Debug)]
pub struct TranslationCache {
    engine: CacheEngine<String>,
}

impl TranslationCache {
    /// 使用默认配置创建翻译缓存
    pub fn new() -> Self {
        Self {
            engine: default_engine(constants::TRANSLATION_CACHE_SIZE, constants::TRANSLATION_CACHE_TTL),
        }
    }

    pub fn with_config(config: &CacheConfig) -> WordSaverResult<Self> {
        Ok(Self {
            engine: CacheEngine::with_config(config)?,
        })
    }

    /// 缓存翻译结果
    pub fn set_translation(&mut self, word: &str, target_lang: &str, translation: &str) -> WordSaverResult<()> {
        let key = translation_key(word, target_lang)?;
        self.engine.set(key, translation.to_string())
    }

    /// 获取翻译缓存
    pub fn get_translation(&mut self, word: &str, target_lang: &str) -> WordSaverResult<Option<String>> {
        let key = translation_key(word, target_lang)?;
        Ok(self.engine.get(&key))
    }

    /// 删除单词的翻译缓存
    pub fn remove_translation(&mut self, word: &str, target_lang: &str) -> WordSaverResult<()> {
        let key = translation_key(word, target_lang)?;
        self.engine.delete(&key);
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        self.engine.stats()
    }

    pub fn engine(&self) -> &CacheEngine<String> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CacheEngine<String> {
        &mut self.engine
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

/// 词典缓存（默认 300 条，30 天）
#[derive(Debug)]
pub struct DictionaryCache {
    engine: CacheEngine<String>,
}

impl DictionaryCache {
    /// 使用默认配置创建词典缓存
    pub fn new() -> Self {
        Self {
            engine: default_engine(constants::DICTIONARY_CACHE_SIZE, constants::DICTIONARY_CACHE_TTL),
        }
    }

    pub fn with_config(config: &CacheConfig) -> WordSaverResult<Self> {
        Ok(Self {
            engine: CacheEngine::with_config(config)?,
        })
    }

    /// 缓存词典释义
    pub fn set_definition(&mut self, word: &str, definition: &str) -> WordSaverResult<()> {
        let key = definition_key(word)?;
        self.engine.set(key, definition.to_string())
    }

    /// 获取词典释义
    pub fn get_definition(&mut self, word: &str) -> WordSaverResult<Option<String>> {
        let key = definition_key(word)?;
        Ok(self.engine.get(&key))
    }

    pub fn remove_definition(&mut self, word: &str) -> WordSaverResult<()> {
        let key = definition_key(word)?;
        self.engine.delete(&key);
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        self.engine.stats()
    }

    pub fn engine(&self) -> &CacheEngine<String> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CacheEngine<String> {
        &mut self.engine
    }
}

impl Default for DictionaryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn default_engine(max_size: usize, ttl: std::time::Duration) -> CacheEngine<String> {
    match CacheEngine::new(max_size, ttl) {
        Ok(engine) => engine,
        // 常量配置均为正数
        Err(e) => unreachable!("内置缓存配置无效: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_lookup_is_case_insensitive() {
        let mut cache = TranslationCache::new();
        cache.set_translation("Hello", "zh-CN", "你好").unwrap();

        assert_eq!(cache.get_translation("hello", "zh-CN").unwrap(), Some("你好".to_string()));
        assert_eq!(cache.get_translation("HELLO", "zh-CN").unwrap(), Some("你好".to_string()));
        assert_eq!(cache.get_translation("hello", "ja").unwrap(), None);
    }

    #[test]
    fn test_translation_keys_collapse_case() {
        assert_eq!(
            translation_key("Hello", "zh-CN").unwrap(),
            translation_key("hello", "zh-CN").unwrap()
        );
        assert_eq!(definition_key(" World ").unwrap(), "definition:world");
    }

    #[test]
    fn test_default_configuration() {
        let cache = TranslationCache::new();
        assert_eq!(cache.engine().max_size(), 500);
        assert_eq!(cache.engine().default_ttl().as_secs(), 7 * 24 * 3600);

        let dictionary = DictionaryCache::new();
        assert_eq!(dictionary.engine().max_size(), 300);
        assert_eq!(dictionary.engine().default_ttl().as_secs(), 30 * 24 * 3600);
    }

    #[test]
    fn test_definition_round_trip_and_removal() {
        let mut cache = DictionaryCache::new();
        cache.set_definition("Apple", "[noun] A fruit").unwrap();
        assert_eq!(cache.get_definition("apple").unwrap(), Some("[noun] A fruit".to_string()));

        cache.remove_definition("APPLE").unwrap();
        assert_eq!(cache.get_definition("apple").unwrap(), None);
        assert_eq!(cache.stats().miss_count, 1);
    }
}
