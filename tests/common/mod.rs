// 集成测试公共模块
//
// 提供内存存储上的测试环境和可编排的翻译服务提供者

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use wordsaver::background::{BackgroundService, Request};
use wordsaver::cache::{DictionaryCache, TranslationCache};
use wordsaver::error::{WordSaverError, WordSaverResult};
use wordsaver::store::MemoryStore;
use wordsaver::translation::{ProviderChain, StaticLinkProvider, TranslationProvider, Translator, TranslatorOptions};

/// 按单词返回固定结果的提供者，未登记的单词视为失败
pub struct ScriptedProvider {
    name: &'static str,
    replies: HashMap<String, String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, replies: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            name,
            replies: replies
                .iter()
                .map(|(word, reply)| (word.to_lowercase(), reply.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn attempt(&self, word: &str) -> WordSaverResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .get(&word.to_lowercase())
            .cloned()
            .ok_or_else(|| WordSaverError::ProviderUnavailable(format!("{}: {}", self.name, word)))
    }
}

/// 测试环境构建器
pub struct TestEnvironmentBuilder {
    translations: Vec<(&'static str, &'static str)>,
    definitions: Vec<(&'static str, &'static str)>,
    enrich: bool,
}

impl TestEnvironmentBuilder {
    pub fn new() -> Self {
        Self {
            translations: vec![("hello", "你好"), ("apple", "苹果"), ("world", "世界")],
            definitions: vec![("hello", "[interjection] A greeting."), ("serendipity", "[noun] A happy accident.")],
            enrich: false,
        }
    }

    pub fn with_enrichment(mut self) -> Self {
        self.enrich = true;
        self
    }

    pub fn build(self) -> TestEnvironment {
        let store = Arc::new(MemoryStore::new());
        let translation_cache = Arc::new(Mutex::new(TranslationCache::new()));
        let dictionary_cache = Arc::new(Mutex::new(DictionaryCache::new()));

        let primary = ScriptedProvider::new("scripted-google", &self.translations);
        let dictionary = ScriptedProvider::new("scripted-dictionary", &self.definitions);

        let chain = ProviderChain::new(Duration::from_secs(1))
            .with_provider(primary.clone())
            .with_provider(dictionary.clone())
            .with_provider(Arc::new(StaticLinkProvider::new("en", "zh-CN")));

        let translator = Translator::new(
            chain,
            translation_cache.clone(),
            dictionary_cache.clone(),
            TranslatorOptions {
                target_lang: "zh-CN".to_string(),
                enrich_with_definition: self.enrich,
                definition_timeout: Duration::from_secs(1),
            },
        )
        .with_dictionary(dictionary.clone());

        let service = BackgroundService::new(store.clone(), translator, translation_cache.clone(), dictionary_cache.clone());

        TestEnvironment {
            store,
            service,
            primary,
            dictionary,
            translation_cache,
            dictionary_cache,
        }
    }
}

/// 测试环境
pub struct TestEnvironment {
    pub store: Arc<MemoryStore>,
    pub service: BackgroundService,
    pub primary: Arc<ScriptedProvider>,
    pub dictionary: Arc<ScriptedProvider>,
    pub translation_cache: Arc<Mutex<TranslationCache>>,
    pub dictionary_cache: Arc<Mutex<DictionaryCache>>,
}

impl TestEnvironment {
    pub fn default() -> Self {
        TestEnvironmentBuilder::new().build()
    }

    /// 以 JSON 发送消息并返回 JSON 响应
    pub async fn send(&self, message: Value) -> Value {
        let request: Request = serde_json::from_value(message).expect("test message should parse");
        let response = self.service.handle(request).await;
        serde_json::to_value(response).expect("response should serialize")
    }

    pub async fn save(&self, word: &str, translation: Option<&str>) -> Value {
        let mut message = serde_json::json!({
            "action": "saveWord",
            "word": word,
            "source": {"url": "https://example.com/article", "title": "Example Article"}
        });
        if let Some(translation) = translation {
            message["translation"] = Value::String(translation.to_string());
        }
        self.send(message).await
    }
}

/// 响应断言
pub struct AssertionHelper;

impl AssertionHelper {
    pub fn assert_success(response: &Value) {
        assert_eq!(response["success"], true, "expected success, got {}", response);
    }

    pub fn assert_error(response: &Value) {
        assert!(response.get("error").is_some(), "expected {{error}}, got {}", response);
        assert!(response.get("success").is_none(), "error responses carry no success flag: {}", response);
    }

    pub fn assert_rejected(response: &Value) {
        assert_eq!(response["success"], false, "expected rejection, got {}", response);
        assert!(response["message"].is_string(), "rejection should carry a message: {}", response);
    }
}
