//! 复习提醒

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{helpers, WordSaverResult};

/// 提醒设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    pub enabled: bool,
    /// 每日提醒时间 (HH:MM)
    pub time: String,
    pub frequency: String,
    /// 待复习单词达到该数量才提醒
    pub min_words: usize,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: "20:00".to_string(),
            frequency: "daily".to_string(),
            min_words: 5,
        }
    }
}

impl ReminderSettings {
    pub fn validate(&self) -> WordSaverResult<()> {
        self.reminder_time()?;
        if self.frequency.trim().is_empty() {
            return Err(helpers::invalid_argument("提醒频率不能为空"));
        }
        Ok(())
    }

    /// 解析提醒时间
    pub fn reminder_time(&self) -> WordSaverResult<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .map_err(|_| helpers::invalid_argument(format!("无效的提醒时间: {}", self.time)))
    }
}

/// 是否应发送提醒：已启用、待复习数达到阈值、今天尚未提醒
pub fn should_send_reminder(
    settings: &ReminderSettings,
    due_count: usize,
    last_reminder: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    if !settings.enabled || due_count < settings.min_words {
        return false;
    }

    last_reminder != Some(today)
}
