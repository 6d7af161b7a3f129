//! 单词记录类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{helpers, WordSaverResult};
use crate::learning::Difficulty;

/// 单词来源页面
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSource {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl WordSource {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// 保存的单词及其复习计划
///
/// `word` 保留原始大小写用于显示，匹配时使用 [`canonical_word`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub word: String,
    #[serde(default)]
    pub translation: Option<String>,
    pub first_saved_at: DateTime<Utc>,
    #[serde(default)]
    pub source: WordSource,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl WordRecord {
    /// 创建新单词记录（NEW 状态：未复习、无计划）
    pub fn new(word: impl Into<String>, source: WordSource, saved_at: DateTime<Utc>) -> Self {
        Self {
            word: word.into(),
            translation: None,
            first_saved_at: saved_at,
            source,
            review_count: 0,
            last_reviewed: None,
            next_review: None,
            difficulty: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    /// 规范化后的匹配键
    pub fn key(&self) -> String {
        canonical_word(&self.word)
    }

    pub fn matches(&self, word: &str) -> bool {
        self.key() == canonical_word(word)
    }
}

/// 单词匹配键：去除首尾空白并转小写
pub fn canonical_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// 校验并整理用户输入的单词
pub fn validate_word(word: &str) -> WordSaverResult<&str> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err(helpers::invalid_argument("无效的单词"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordSaverError;

    #[test]
    fn test_matching_is_case_insensitive() {
        let record = WordRecord::new("Hello", WordSource::default(), Utc::now());
        assert!(record.matches("hello"));
        assert!(record.matches(" HELLO "));
        assert!(!record.matches("help"));
        assert_eq!(record.word, "Hello");
    }

    #[test]
    fn test_validate_word() {
        assert_eq!(validate_word("  apple ").unwrap(), "apple");
        assert!(matches!(validate_word("   "), Err(WordSaverError::InvalidArgument(_))));
    }

    #[test]
    fn test_record_deserializes_with_missing_schedule_fields() {
        let json = r#"{"word":"apple","firstSavedAt":"2024-05-01T10:00:00Z","source":{"url":"https://a.b","title":"A"}}"#;
        let record: WordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.review_count, 0);
        assert!(record.next_review.is_none());
        assert!(record.difficulty.is_none());
        assert!(record.translation.is_none());
    }
}
