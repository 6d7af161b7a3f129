//! 后台服务模块
//!
//! - **messages**: 请求/响应消息契约
//! - **service**: 消息处理与持久化

pub mod messages;
pub mod service;

pub use messages::{Request, Response};
pub use service::{BackgroundService, LearningOverview, ReminderCheck};
