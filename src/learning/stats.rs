//! 学习统计
//!
//! 按本地日期累计复习次数和正确数，并维护连续答对次数。

use std::collections::BTreeMap;

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 每周目标
pub const DEFAULT_WEEKLY_GOAL: u32 = 50;
/// 每月目标
pub const DEFAULT_MONTHLY_GOAL: u32 = 200;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 单日统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub reviewed: u32,
    pub correct: u32,
}

/// 累计学习统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningStats {
    pub total_reviews: u64,
    pub correct_reviews: u64,
    pub current_streak: u32,
    pub max_streak: u32,
    pub last_review_date: Option<DateTime<Utc>>,
    /// 本地日期 (YYYY-MM-DD) → 当天统计
    pub daily_stats: BTreeMap<String, DailyStat>,
    pub weekly_goal: u32,
    pub monthly_goal: u32,
}

impl Default for LearningStats {
    fn default() -> Self {
        Self {
            total_reviews: 0,
            correct_reviews: 0,
            current_streak: 0,
            max_streak: 0,
            last_review_date: None,
            daily_stats: BTreeMap::new(),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            monthly_goal: DEFAULT_MONTHLY_GOAL,
        }
    }
}

/// 最近 7 天中的一天
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: String,
    pub reviewed: u32,
    pub correct: u32,
}

/// 最近 7 天统计（含今天）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub reviewed: u32,
    pub correct: u32,
    /// 从最早到今天
    pub days: Vec<DayStat>,
}

impl LearningStats {
    /// 记录一次复习（使用当前时间）
    pub fn record_review(&mut self, correct: bool) {
        self.record_review_at(correct, Utc::now());
    }

    /// 记录一次复习
    ///
    /// 答对时连续答对数加一并刷新最高纪录，答错时清零。
    pub fn record_review_at(&mut self, correct: bool, at: DateTime<Utc>) {
        self.total_reviews += 1;

        let day = self.daily_stats.entry(date_key(local_date(at))).or_default();
        day.reviewed += 1;

        if correct {
            day.correct += 1;
            self.correct_reviews += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }

        self.last_review_date = Some(at);
    }

    /// 正确率百分比（四舍五入），无复习时为 0
    pub fn accuracy(&self) -> u32 {
        calculate_accuracy(self.correct_reviews, self.total_reviews)
    }

    pub fn day(&self, date: NaiveDate) -> DailyStat {
        self.daily_stats.get(&date_key(date)).copied().unwrap_or_default()
    }

    /// 最近 7 天统计，`today` 为本地日期
    pub fn weekly_stats(&self, today: NaiveDate) -> WeeklyStats {
        let mut weekly = WeeklyStats::default();

        for offset in (0..7).rev() {
            let date = today - ChronoDuration::days(offset);
            let stat = self.day(date);

            weekly.reviewed += stat.reviewed;
            weekly.correct += stat.correct;
            weekly.days.push(DayStat {
                date: date_key(date),
                reviewed: stat.reviewed,
                correct: stat.correct,
            });
        }

        weekly
    }
}

/// 正确率百分比（四舍五入），总数为 0 时为 0
pub fn calculate_accuracy(correct: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round().min(100.0) as u32
}

/// 时间点对应的本地日期
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_rounding() {
        assert_eq!(calculate_accuracy(0, 0), 0);
        assert_eq!(calculate_accuracy(2, 3), 67);
        assert_eq!(calculate_accuracy(1, 3), 33);
        assert_eq!(calculate_accuracy(5, 5), 100);
    }

    #[test]
    fn test_record_review_counts() {
        let mut stats = LearningStats::default();
        let now = Utc::now();
        stats.record_review_at(true, now);
        stats.record_review_at(false, now);
        stats.record_review_at(true, now);

        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.correct_reviews, 2);
        assert_eq!(stats.accuracy(), 67);

        let day = stats.day(local_date(now));
        assert_eq!(day, DailyStat { reviewed: 3, correct: 2 });
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 1);
    }

    #[test]
    fn test_streak_resets_on_wrong_answer() {
        let mut stats = LearningStats::default();
        let now = Utc::now();

        for _ in 0..3 {
            stats.record_review_at(true, now);
        }
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.max_streak, 3);

        stats.record_review_at(false, now);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.max_streak, 3);

        stats.record_review_at(true, now);
        assert_eq!(stats.current_streak, 1);
        assert!(stats.current_streak <= stats.max_streak);
        assert!(stats.correct_reviews <= stats.total_reviews);
    }

    #[test]
    fn test_weekly_stats_window() {
        let mut stats = LearningStats::default();
        let now = Utc::now();
        stats.record_review_at(true, now);
        stats.record_review_at(false, now - ChronoDuration::days(6));
        stats.record_review_at(true, now - ChronoDuration::days(7));

        let weekly = stats.weekly_stats(local_date(now));
        assert_eq!(weekly.days.len(), 7);
        assert_eq!(weekly.reviewed, 2);
        assert_eq!(weekly.correct, 1);
        assert_eq!(weekly.days.last().unwrap().date, date_key(local_date(now)));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(LearningStats::default()).unwrap();
        assert_eq!(json["totalReviews"], 0);
        assert_eq!(json["weeklyGoal"], 50);
        assert_eq!(json["monthlyGoal"], 200);
        assert!(json["dailyStats"].is_object());

        let partial: LearningStats = serde_json::from_str(r#"{"totalReviews": 4}"#).unwrap();
        assert_eq!(partial.total_reviews, 4);
        assert_eq!(partial.weekly_goal, 50);
    }
}
