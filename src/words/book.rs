//! 单词本
//!
//! 保存的单词列表与翻译映射。单词按不区分大小写的方式去重，
//! 翻译映射以首次保存时的原始拼写为键。

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{canonical_word, validate_word, WordRecord, WordSource};
use crate::error::WordSaverResult;
use crate::learning::{MemoryCurve, ReviewUrgency};

/// 保存结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// 待复习单词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueWord {
    #[serde(flatten)]
    pub record: WordRecord,
    pub urgency: ReviewUrgency,
}

/// 单词本
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordBook {
    words: Vec<WordRecord>,
    translations: BTreeMap<String, String>,
}

impl WordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由持久化的单词列表和翻译映射构建
    pub fn from_parts(mut words: Vec<WordRecord>, translations: BTreeMap<String, String>) -> Self {
        for record in &mut words {
            if record.translation.is_none() {
                record.translation = translations.get(&record.word).cloned();
            }
        }
        Self { words, translations }
    }

    pub fn into_parts(self) -> (Vec<WordRecord>, BTreeMap<String, String>) {
        (self.words, self.translations)
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn translations(&self) -> &BTreeMap<String, String> {
        &self.translations
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some()
    }

    /// 不区分大小写查找
    pub fn find(&self, word: &str) -> Option<&WordRecord> {
        let key = canonical_word(word);
        self.words.iter().find(|record| record.key() == key)
    }

    pub fn find_mut(&mut self, word: &str) -> Option<&mut WordRecord> {
        let key = canonical_word(word);
        self.words.iter_mut().find(|record| record.key() == key)
    }

    /// 单词的翻译：优先翻译映射，其次记录自身
    pub fn translation_of<'a>(&'a self, record: &'a WordRecord) -> Option<&'a str> {
        self.translations
            .get(&record.word)
            .map(String::as_str)
            .or(record.translation.as_deref())
    }

    /// 保存单词
    ///
    /// 已存在时（不区分大小写）不新增记录，只在提供非空翻译时更新翻译。
    pub fn save(
        &mut self,
        word: &str,
        translation: Option<&str>,
        source: WordSource,
        now: DateTime<Utc>,
    ) -> WordSaverResult<SaveOutcome> {
        let word = validate_word(word)?;
        let translation = translation.map(str::trim).filter(|t| !t.is_empty());

        let outcome = if self.contains(word) {
            SaveOutcome::Updated
        } else {
            self.words.push(WordRecord::new(word, source, now));
            SaveOutcome::Created
        };

        if let Some(translation) = translation {
            self.set_translation(word, translation);
        }

        Ok(outcome)
    }

    /// 更新已保存单词的翻译
    pub fn set_translation(&mut self, word: &str, translation: &str) -> bool {
        let Some(record) = self.find_mut(word) else {
            return false;
        };

        record.translation = Some(translation.to_string());
        let stored_as = record.word.clone();
        self.translations.insert(stored_as, translation.to_string());
        true
    }

    /// 删除单词及其翻译
    pub fn remove(&mut self, word: &str) -> Option<WordRecord> {
        let key = canonical_word(word);
        let index = self.words.iter().position(|record| record.key() == key)?;
        let removed = self.words.remove(index);

        self.translations.retain(|stored, _| canonical_word(stored) != key);
        Some(removed)
    }

    /// 搜索单词
    ///
    /// 空搜索返回全部单词（最新在前）；否则按包含匹配过滤，
    /// 排序为完全匹配、前缀匹配、保存时间倒序。
    pub fn search(&self, term: &str) -> Vec<WordRecord> {
        let term = canonical_word(term);
        let mut results: Vec<WordRecord> = if term.is_empty() {
            self.words.clone()
        } else {
            self.words
                .iter()
                .filter(|record| record.key().contains(&term))
                .cloned()
                .collect()
        };

        results.sort_by(|a, b| {
            if term.is_empty() {
                return newest_first(a, b);
            }

            let (a_key, b_key) = (a.key(), b.key());
            (b_key == term)
                .cmp(&(a_key == term))
                .then_with(|| b_key.starts_with(&term).cmp(&a_key.starts_with(&term)))
                .then_with(|| newest_first(a, b))
        });

        results
    }

    /// 需要复习的单词，按紧急程度排序
    pub fn due_words(&self, curve: &MemoryCurve, now: DateTime<Utc>) -> Vec<DueWord> {
        let mut due: Vec<DueWord> = self
            .words
            .iter()
            .filter(|record| curve.needs_review_at(record, now))
            .map(|record| DueWord {
                record: record.clone(),
                urgency: curve.review_urgency_at(record, now),
            })
            .collect();

        due.sort_by(|a, b| {
            a.urgency
                .cmp(&b.urgency)
                .then_with(|| a.record.key().cmp(&b.record.key()))
        });
        due
    }

    /// 按字母顺序（不区分大小写）排列的单词
    pub fn alphabetical(&self) -> Vec<&WordRecord> {
        let mut sorted: Vec<&WordRecord> = self.words.iter().collect();
        sorted.sort_by(|a, b| a.key().cmp(&b.key()).then_with(|| a.word.cmp(&b.word)));
        sorted
    }
}

fn newest_first(a: &WordRecord, b: &WordRecord) -> Ordering {
    b.first_saved_at.cmp(&a.first_saved_at)
}
