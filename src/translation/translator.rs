//! 翻译流水线
//!
//! 查翻译缓存 → 未命中时走提供者链 → 主提供者成功时补充英文释义 →
//! 写回缓存 → 按请求语境装饰。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::chain::{attempt_with_timeout, ProviderChain};
use super::context::{append_definition, decorate, TranslationContext};
use super::provider::{http_client, DictionaryApiProvider, GoogleTranslateProvider, StaticLinkProvider, TranslationProvider};
use crate::cache::{lock, DictionaryCache, TranslationCache};
use crate::config::WordSaverConfig;
use crate::error::WordSaverResult;
use crate::words::record::validate_word;

/// 翻译流水线选项
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    pub target_lang: String,
    pub enrich_with_definition: bool,
    pub definition_timeout: Duration,
}

impl From<&WordSaverConfig> for TranslatorOptions {
    fn from(config: &WordSaverConfig) -> Self {
        Self {
            target_lang: config.target_lang.clone(),
            enrich_with_definition: config.enrich_with_definition,
            definition_timeout: config.provider_timeout(),
        }
    }
}

/// 带缓存的翻译器
pub struct Translator {
    chain: ProviderChain,
    dictionary: Option<Arc<dyn TranslationProvider>>,
    translation_cache: Arc<Mutex<TranslationCache>>,
    dictionary_cache: Arc<Mutex<DictionaryCache>>,
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(
        chain: ProviderChain,
        translation_cache: Arc<Mutex<TranslationCache>>,
        dictionary_cache: Arc<Mutex<DictionaryCache>>,
        options: TranslatorOptions,
    ) -> Self {
        Self {
            chain,
            dictionary: None,
            translation_cache,
            dictionary_cache,
            options,
        }
    }

    /// 设置用于补充英文释义的词典提供者
    pub fn with_dictionary(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.dictionary = Some(provider);
        self
    }

    /// 按配置创建标准链：Google 翻译 → 英文词典 → 静态链接
    pub fn from_config(
        config: &WordSaverConfig,
        translation_cache: Arc<Mutex<TranslationCache>>,
        dictionary_cache: Arc<Mutex<DictionaryCache>>,
    ) -> WordSaverResult<Self> {
        let client = http_client()?;
        let dictionary: Arc<dyn TranslationProvider> = Arc::new(DictionaryApiProvider::new(client.clone()));

        let chain = ProviderChain::new(config.provider_timeout())
            .with_provider(Arc::new(GoogleTranslateProvider::new(
                client,
                &config.source_lang,
                &config.target_lang,
            )))
            .with_provider(dictionary.clone())
            .with_provider(Arc::new(StaticLinkProvider::new(&config.source_lang, &config.target_lang)));

        tracing::info!("翻译服务链: {}", chain.provider_names().join(" → "));

        Ok(Self::new(chain, translation_cache, dictionary_cache, TranslatorOptions::from(config)).with_dictionary(dictionary))
    }

    pub fn target_lang(&self) -> &str {
        &self.options.target_lang
    }

    /// 翻译单词并按语境装饰
    pub async fn translate(&self, word: &str, context: &TranslationContext, page_title: &str) -> WordSaverResult<String> {
        let word = validate_word(word)?;
        let translation = self.lookup(word).await?;
        Ok(decorate(word, &translation, context, page_title))
    }

    /// 获取基础翻译（不含语境），命中缓存时不访问网络
    pub async fn lookup(&self, word: &str) -> WordSaverResult<String> {
        let word = validate_word(word)?;

        if let Some(cached) = self.cached_translation(word)? {
            metrics::counter!("wordsaver_cache_hits_total").increment(1);
            tracing::debug!("翻译缓存命中: {}", word);
            return Ok(cached);
        }

        metrics::counter!("wordsaver_cache_misses_total").increment(1);
        tracing::debug!("翻译缓存未命中: {}", word);

        let outcome = self.chain.translate(word).await?;
        let mut text = outcome.text;

        if outcome.primary && self.options.enrich_with_definition {
            if let Some(definition) = self.definition(word).await {
                text = append_definition(&text, &definition);
            }
        }

        if outcome.cacheable {
            lock(&self.translation_cache).set_translation(word, &self.options.target_lang, &text)?;
        }

        Ok(text)
    }

    /// 英文释义，先查词典缓存；失败时返回 `None`
    pub async fn definition(&self, word: &str) -> Option<String> {
        let provider = self.dictionary.as_ref()?;

        match lock(&self.dictionary_cache).get_definition(word) {
            Ok(Some(cached)) => return Some(cached),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!("词典缓存读取失败: {}", e);
                return None;
            }
        }

        match attempt_with_timeout(provider.as_ref(), word, self.options.definition_timeout).await {
            Ok(definition) => {
                if let Err(e) = lock(&self.dictionary_cache).set_definition(word, &definition) {
                    tracing::debug!("词典缓存写入失败: {}", e);
                }
                Some(definition)
            }
            Err(e) => {
                tracing::debug!("获取英文释义失败 {}: {}", word, e);
                None
            }
        }
    }

    /// 清除单词的翻译缓存与词典缓存
    pub fn evict(&self, word: &str) -> WordSaverResult<()> {
        lock(&self.translation_cache).remove_translation(word, &self.options.target_lang)?;
        lock(&self.dictionary_cache).remove_definition(word)?;
        Ok(())
    }

    fn cached_translation(&self, word: &str) -> WordSaverResult<Option<String>> {
        lock(&self.translation_cache).get_translation(word, &self.options.target_lang)
    }
}
