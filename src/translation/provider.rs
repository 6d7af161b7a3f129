//! 翻译服务提供者
//!
//! 每个提供者对一个单词做一次尝试，成功返回文本，失败返回
//! `ProviderUnavailable`，由 [`ProviderChain`](super::ProviderChain) 决定是否回退。

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::constants;
use crate::error::{helpers, WordSaverResult};

/// 与 `encodeURIComponent` 一致的保留字符集
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 词典释义最多取几个词性
const MAX_MEANINGS: usize = 2;

/// 翻译服务提供者
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 提供者名称，用于日志
    fn name(&self) -> &str;

    /// 结果是否可以写入翻译缓存
    fn is_cacheable(&self) -> bool {
        true
    }

    /// 尝试翻译一个单词
    async fn attempt(&self, word: &str) -> WordSaverResult<String>;
}

/// 提供者共用的 HTTP 客户端
pub fn http_client() -> WordSaverResult<Client> {
    Client::builder()
        .user_agent(concat!("wordsaver/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| helpers::provider_unavailable(format!("创建HTTP客户端失败: {}", e)))
}

// ============================================================================
// Google 翻译
// ============================================================================

/// Google 翻译网页端接口（`client=gtx`，无需密钥）
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    client: Client,
    endpoint: String,
    source_lang: String,
    target_lang: String,
}

impl GoogleTranslateProvider {
    pub fn new(client: Client, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: constants::GOOGLE_TRANSLATE_URL.to_string(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_url(&self, word: &str) -> WordSaverResult<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", self.source_lang.as_str()),
                ("tl", self.target_lang.as_str()),
                ("dt", "t"),
                ("q", word),
            ],
        )
        .map_err(|e| helpers::invalid_argument(format!("无效的翻译服务地址: {}", e)))
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn attempt(&self, word: &str) -> WordSaverResult<String> {
        let url = self.request_url(word)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(helpers::provider_unavailable(format!(
                "Google翻译请求失败: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        parse_google_response(&data)
            .ok_or_else(|| helpers::provider_unavailable("Google翻译响应格式不正确"))
    }
}

/// 解析 `[[["译文","原文",...]],null,"en"]` 形式的响应
pub fn parse_google_response(data: &Value) -> Option<String> {
    data.get(0)?
        .get(0)?
        .get(0)?
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

// ============================================================================
// 英文词典
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub definition: String,
}

/// dictionaryapi.dev 英文释义
#[derive(Debug, Clone)]
pub struct DictionaryApiProvider {
    client: Client,
    endpoint: String,
}

impl DictionaryApiProvider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: constants::DICTIONARY_API_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for DictionaryApiProvider {
    fn name(&self) -> &str {
        "dictionary"
    }

    async fn attempt(&self, word: &str) -> WordSaverResult<String> {
        let url = format!("{}{}", self.endpoint, utf8_percent_encode(word, COMPONENT));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(helpers::provider_unavailable(format!(
                "词典API请求失败: {}",
                response.status()
            )));
        }

        let entries: Vec<DictionaryEntry> = response.json().await?;
        format_definitions(&entries)
            .ok_or_else(|| helpers::provider_unavailable(format!("词典中没有 {} 的释义", word)))
    }
}

/// 取第一个词条的前两个词性，格式 `[noun] ...; [verb] ...`
pub fn format_definitions(entries: &[DictionaryEntry]) -> Option<String> {
    let parts: Vec<String> = entries
        .first()?
        .meanings
        .iter()
        .take(MAX_MEANINGS)
        .filter_map(|meaning| {
            let definition = meaning.definitions.first()?.definition.trim();
            if definition.is_empty() {
                return None;
            }
            Some(match meaning.part_of_speech.as_deref() {
                Some(pos) if !pos.is_empty() => format!("[{}] {}", pos, definition),
                _ => definition.to_string(),
            })
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

// ============================================================================
// 静态参考链接
// ============================================================================

/// 最后的回退：指向 Google 翻译网页的链接，不会失败，也不缓存
#[derive(Debug, Clone)]
pub struct StaticLinkProvider {
    base_url: String,
    source_lang: String,
    target_lang: String,
}

impl StaticLinkProvider {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            base_url: constants::REFERENCE_LINK_URL.to_string(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    pub fn link(&self, word: &str) -> String {
        format!(
            "{}?sl={}&tl={}&text={}",
            self.base_url,
            self.source_lang,
            self.target_lang,
            utf8_percent_encode(word, COMPONENT)
        )
    }
}

#[async_trait]
impl TranslationProvider for StaticLinkProvider {
    fn name(&self) -> &str {
        "static-link"
    }

    fn is_cacheable(&self) -> bool {
        false
    }

    async fn attempt(&self, word: &str) -> WordSaverResult<String> {
        Ok(format!("请点击查看: {}", self.link(word)))
    }
}
