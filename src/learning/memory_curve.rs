//! 记忆曲线调度
//!
//! 复习间隔按艾宾浩斯遗忘曲线递增，难度系数按十分位整数计算，
//! 避免浮点误差导致的天数偏差。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration as ChronoDuration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{helpers, WordSaverError};
use crate::words::WordRecord;

/// 复习间隔（天）
pub const REVIEW_INTERVALS: [i64; 8] = [1, 3, 7, 15, 30, 90, 180, 365];

/// 复习难度评价
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Again,
}

impl Difficulty {
    /// 间隔系数（十分位）：easy 0.8，normal 1.0，hard 1.3，again 0.3
    pub fn factor_tenths(self) -> i64 {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Normal => 10,
            Difficulty::Hard => 13,
            Difficulty::Again => 3,
        }
    }

    pub fn factor(self) -> f64 {
        self.factor_tenths() as f64 / 10.0
    }

    /// 是否计为答对；只有 again 计为答错
    pub fn is_correct(self) -> bool {
        self != Difficulty::Again
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Again => "again",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = WordSaverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "again" => Ok(Difficulty::Again),
            other => Err(helpers::invalid_argument(format!("未知的难度: {}", other))),
        }
    }
}

/// 复习紧急程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewUrgency {
    Urgent,
    Due,
    Upcoming,
    Learned,
}

/// 单词的复习状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewState {
    /// 从未复习
    New,
    /// 已排期，未到期
    Scheduled,
    /// 当天到期
    Due,
    /// 过期超过一天
    Overdue,
}

/// 记忆曲线调度器
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryCurve;

impl MemoryCurve {
    pub fn new() -> Self {
        Self
    }

    /// 计算下次复习间隔（天）
    ///
    /// again 重置到第一档；其余按复习次数取档位（超出取最后一档）再乘系数，
    /// 结果向下取整。
    pub fn interval_days(&self, review_count: u32, difficulty: Difficulty) -> i64 {
        let index = match difficulty {
            Difficulty::Again => 0,
            _ => (review_count as usize).min(REVIEW_INTERVALS.len() - 1),
        };
        REVIEW_INTERVALS[index] * difficulty.factor_tenths() / 10
    }

    /// 计算下次复习时间
    pub fn calculate_next_review(&self, record: &WordRecord, difficulty: Difficulty) -> DateTime<Utc> {
        self.calculate_next_review_at(record, difficulty, Utc::now())
    }

    pub fn calculate_next_review_at(
        &self,
        record: &WordRecord,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        now + ChronoDuration::days(self.interval_days(record.review_count, difficulty))
    }

    /// 记录一次复习：更新次数、时间、难度和下次复习时间
    pub fn apply_review(&self, record: &mut WordRecord, difficulty: Difficulty, now: DateTime<Utc>) -> DateTime<Utc> {
        let next = self.calculate_next_review_at(record, difficulty, now);

        record.review_count += 1;
        record.last_reviewed = Some(now);
        record.next_review = Some(next);
        record.difficulty = Some(difficulty);

        tracing::debug!(
            "单词 {} 复习完成: 难度 {}, 第 {} 次, 下次复习 {}",
            record.word,
            difficulty,
            record.review_count,
            next
        );

        next
    }

    /// 是否需要复习：未排期或已到期
    pub fn needs_review(&self, record: &WordRecord) -> bool {
        self.needs_review_at(record, Utc::now())
    }

    pub fn needs_review_at(&self, record: &WordRecord, now: DateTime<Utc>) -> bool {
        match record.next_review {
            None => true,
            Some(next) => now >= next,
        }
    }

    /// 按本地日历天计算紧急程度
    pub fn review_urgency(&self, record: &WordRecord) -> ReviewUrgency {
        self.review_urgency_at(record, Utc::now())
    }

    pub fn review_urgency_at(&self, record: &WordRecord, now: DateTime<Utc>) -> ReviewUrgency {
        let Some(next) = record.next_review else {
            return ReviewUrgency::Urgent;
        };

        match calendar_days_between(now, next) {
            d if d < 0 => ReviewUrgency::Urgent,
            0 => ReviewUrgency::Due,
            1..=3 => ReviewUrgency::Upcoming,
            _ => ReviewUrgency::Learned,
        }
    }

    /// 复习状态
    pub fn review_state_at(&self, record: &WordRecord, now: DateTime<Utc>) -> ReviewState {
        let Some(next) = record.next_review else {
            return ReviewState::New;
        };

        if now < next {
            return ReviewState::Scheduled;
        }

        if calendar_days_between(next, now) >= 1 {
            ReviewState::Overdue
        } else {
            ReviewState::Due
        }
    }
}

/// `to` 与 `from` 之间相差的本地日历天数
fn calendar_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let from = from.with_timezone(&Local).date_naive();
    let to = to.with_timezone(&Local).date_naive();
    to.signed_duration_since(from).num_days()
}
