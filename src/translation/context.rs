//! 翻译语境装饰
//!
//! 在缓存的基础翻译之后追加句子语境、页面类型提示和页面主题提示。
//! 装饰结果与请求相关，不写入缓存。

use serde::{Deserialize, Serialize};

const SENTENCE_LIMIT: usize = 100;
const TITLE_LIMIT: usize = 50;

/// 悬停单词时页面提供的语境
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationContext {
    pub sentence: Option<String>,
    pub page_type: Option<String>,
}

/// 页面类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    News,
    Academic,
    Blog,
    Wiki,
    Documentation,
}

impl PageType {
    /// 解析页面类型，未知类型返回 `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "news" => Some(PageType::News),
            "academic" => Some(PageType::Academic),
            "blog" => Some(PageType::Blog),
            "wiki" => Some(PageType::Wiki),
            "documentation" => Some(PageType::Documentation),
            _ => None,
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            PageType::News => "📰 新闻语境中",
            PageType::Academic => "🎓 学术语境中",
            PageType::Blog => "📝 博客语境中",
            PageType::Wiki => "📚 百科语境中",
            PageType::Documentation => "📋 技术文档中",
        }
    }
}

/// 追加英文释义（与译文相同时不追加）
pub fn append_definition(translation: &str, definition: &str) -> String {
    let definition = definition.trim();
    if definition.is_empty() || definition == translation.trim() {
        return translation.to_string();
    }
    format!("{}\n\n📖 英文释义: {}", translation, definition)
}

/// 根据语境装饰翻译结果
pub fn decorate(word: &str, translation: &str, context: &TranslationContext, page_title: &str) -> String {
    let mut result = translation.to_string();

    if let Some(sentence) = context.sentence.as_deref().filter(|s| !s.trim().is_empty()) {
        result.push_str(&format!("\n\n📝 句子语境: \"{}\"", truncate(sentence, SENTENCE_LIMIT)));
    }

    if let Some(page_type) = context.page_type.as_deref().and_then(PageType::parse) {
        result.push_str(&format!("\n\n{}，此词可能有特定含义", page_type.hint()));
    }

    if is_related_to_title(word, page_title) {
        result.push_str(&format!(
            "\n\n🎯 与页面主题 \"{}\" 相关",
            truncate(page_title, TITLE_LIMIT)
        ));
    }

    result
}

/// 页面标题中是否有词与单词互相包含
pub fn is_related_to_title(word: &str, page_title: &str) -> bool {
    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return false;
    }

    page_title
        .to_lowercase()
        .split_whitespace()
        .any(|title_word| title_word.contains(&word) || word.contains(title_word))
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head)
}
