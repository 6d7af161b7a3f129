//! 学习模块
//!
//! - **memory_curve**: 记忆曲线复习调度
//! - **stats**: 学习统计与连续天数
//! - **reminder**: 复习提醒判定

pub mod memory_curve;
pub mod reminder;
pub mod stats;

pub use memory_curve::{Difficulty, MemoryCurve, ReviewState, ReviewUrgency, REVIEW_INTERVALS};
pub use reminder::{should_send_reminder, ReminderSettings};
pub use stats::{calculate_accuracy, local_date, DailyStat, DayStat, LearningStats, WeeklyStats};
