//! 消息契约
//!
//! 请求以 `action` 字段区分；响应保持扩展使用的 JSON 形状：
//! 成功为 `{success: true, ...}`，失败为 `{error}` 或 `{success: false, message}`。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::learning::{LearningStats, ReminderSettings, WeeklyStats};
use crate::translation::TranslationContext;
use crate::words::{DueWord, WordRecord, WordSource};

/// 后台服务请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// 扩展附带的 `pageUrl` 不参与翻译，解析时忽略
    GetTranslation {
        #[serde(default)]
        word: String,
        #[serde(default)]
        context: TranslationContext,
        #[serde(default, rename = "pageTitle")]
        page_title: String,
    },
    SaveWord {
        #[serde(default)]
        word: String,
        #[serde(default)]
        translation: Option<String>,
        #[serde(default)]
        source: WordSource,
    },
    DeleteWord {
        #[serde(default)]
        word: String,
    },
    ReviewWord {
        #[serde(default)]
        word: String,
        /// 解析推迟到处理阶段，未知值返回 `{error}`
        #[serde(default)]
        difficulty: String,
    },
    ExportWordList,
    ImportWordList {
        #[serde(default, rename = "csvData")]
        csv_data: Option<String>,
    },
    PerformSearch {
        #[serde(default, rename = "searchTerm")]
        search_term: String,
    },
    GetDueWords,
    GetLearningStats,
    GetCacheStats,
    GetReminderSettings,
    SetReminderSettings {
        settings: ReminderSettings,
    },
    CheckReminder,
    Ping,
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetTranslation { .. } => "getTranslation",
            Request::SaveWord { .. } => "saveWord",
            Request::DeleteWord { .. } => "deleteWord",
            Request::ReviewWord { .. } => "reviewWord",
            Request::ExportWordList => "exportWordList",
            Request::ImportWordList { .. } => "importWordList",
            Request::PerformSearch { .. } => "performSearch",
            Request::GetDueWords => "getDueWords",
            Request::GetLearningStats => "getLearningStats",
            Request::GetCacheStats => "getCacheStats",
            Request::GetReminderSettings => "getReminderSettings",
            Request::SetReminderSettings { .. } => "setReminderSettings",
            Request::CheckReminder => "checkReminder",
            Request::Ping => "ping",
        }
    }
}

/// 后台服务响应
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Failure {
        error: String,
    },
    Rejected {
        success: bool,
        message: String,
    },
    Translation {
        success: bool,
        translation: String,
    },
    Saved {
        success: bool,
        exists: bool,
    },
    Reviewed {
        success: bool,
        #[serde(rename = "nextReview")]
        next_review: DateTime<Utc>,
    },
    Exported {
        success: bool,
        csv: String,
    },
    Imported {
        success: bool,
        count: usize,
    },
    SearchResults {
        success: bool,
        results: Vec<WordRecord>,
    },
    DueWords {
        success: bool,
        words: Vec<DueWord>,
    },
    LearningStats {
        success: bool,
        stats: LearningStats,
        accuracy: u32,
        weekly: WeeklyStats,
    },
    CacheStats {
        success: bool,
        translation: CacheStats,
        dictionary: CacheStats,
    },
    ReminderSettings {
        success: bool,
        settings: ReminderSettings,
    },
    ReminderCheck {
        success: bool,
        #[serde(rename = "shouldRemind")]
        should_remind: bool,
        #[serde(rename = "dueCount")]
        due_count: usize,
    },
    Pong {
        success: bool,
        action: String,
    },
    Done {
        success: bool,
    },
}

impl Response {
    pub fn failure(error: impl Into<String>) -> Self {
        Response::Failure { error: error.into() }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Response::Rejected {
            success: false,
            message: message.into(),
        }
    }

    pub fn done() -> Self {
        Response::Done { success: true }
    }

    pub fn pong() -> Self {
        Response::Pong {
            success: true,
            action: "pong".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Response::Failure { .. } => false,
            Response::Rejected { success, .. } => *success,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_parsing() {
        let request: Request = serde_json::from_value(json!({
            "action": "getTranslation",
            "word": "hello",
            "context": {"sentence": "hello there", "pageType": "blog"},
            "pageTitle": "Greetings",
            "pageUrl": "https://example.com/greetings"
        }))
        .unwrap();

        match request {
            Request::GetTranslation { word, context, page_title } => {
                assert_eq!(word, "hello");
                assert_eq!(context.page_type.as_deref(), Some("blog"));
                assert_eq!(page_title, "Greetings");
            }
            other => panic!("unexpected request: {:?}", other),
        }

        let request: Request = serde_json::from_value(json!({"action": "ping"})).unwrap();
        assert_eq!(request, Request::Ping);
        assert_eq!(request.action(), "ping");
    }

    #[test]
    fn test_missing_word_defaults_to_empty() {
        let request: Request = serde_json::from_value(json!({"action": "deleteWord"})).unwrap();
        assert_eq!(request, Request::DeleteWord { word: String::new() });
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(serde_json::from_value::<Request>(json!({"action": "launchRocket"})).is_err());
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(serde_json::to_value(Response::failure("无效的单词")).unwrap(), json!({"error": "无效的单词"}));
        assert_eq!(
            serde_json::to_value(Response::rejected("未提供数据")).unwrap(),
            json!({"success": false, "message": "未提供数据"})
        );
        assert_eq!(
            serde_json::to_value(Response::pong()).unwrap(),
            json!({"success": true, "action": "pong"})
        );
        assert_eq!(
            serde_json::to_value(Response::Saved { success: true, exists: false }).unwrap(),
            json!({"success": true, "exists": false})
        );
        assert!(!Response::failure("x").is_success());
        assert!(!Response::rejected("x").is_success());
        assert!(Response::done().is_success());
    }
}
