//! 统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。所有核心操作都返回 [`WordSaverResult`]，
//! 消息层再把错误映射成 `{error}` 或 `{success:false}` 响应。

use std::fmt;

use thiserror::Error;

/// WordSaver 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WordSaverError {
    /// 输入验证错误（TTL、难度、空单词等）
    #[error("输入无效: {0}")]
    InvalidArgument(String),

    /// 翻译服务不可用（网络或解析失败）
    #[error("翻译服务不可用: {0}")]
    ProviderUnavailable(String),

    /// 持久化存储读写失败
    #[error("存储失败: {0}")]
    StorageFailure(String),

    /// 单词不存在
    #[error("未找到: {0}")]
    NotFound(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 本地 HTTP 服务错误
    #[error("服务器错误: {0}")]
    ServerError(String),
}

impl WordSaverError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            WordSaverError::ProviderUnavailable(_) => true,
            WordSaverError::TimeoutError(_) => true,
            WordSaverError::StorageFailure(_) => false, // 不自动重试写入
            WordSaverError::InvalidArgument(_) => false,
            WordSaverError::NotFound(_) => false,
            WordSaverError::ConfigError(_) => false,
            WordSaverError::SerializationError(_) => false,
            WordSaverError::ServerError(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WordSaverError::InvalidArgument(_) => ErrorSeverity::Info,
            WordSaverError::NotFound(_) => ErrorSeverity::Info,
            WordSaverError::ProviderUnavailable(_) => ErrorSeverity::Warning,
            WordSaverError::TimeoutError(_) => ErrorSeverity::Warning,
            WordSaverError::StorageFailure(_) => ErrorSeverity::Error,
            WordSaverError::SerializationError(_) => ErrorSeverity::Error,
            WordSaverError::ConfigError(_) => ErrorSeverity::Critical,
            WordSaverError::ServerError(_) => ErrorSeverity::Critical,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let new_msg = format!("{} (上下文: {})", self.message(), context);

        match &mut self {
            WordSaverError::InvalidArgument(ref mut msg)
            | WordSaverError::ProviderUnavailable(ref mut msg)
            | WordSaverError::StorageFailure(ref mut msg)
            | WordSaverError::NotFound(ref mut msg)
            | WordSaverError::ConfigError(ref mut msg)
            | WordSaverError::SerializationError(ref mut msg)
            | WordSaverError::TimeoutError(ref mut msg)
            | WordSaverError::ServerError(ref mut msg) => *msg = new_msg,
        }

        self
    }

    /// 错误携带的原始消息（不含类别前缀）
    pub fn message(&self) -> &str {
        match self {
            WordSaverError::InvalidArgument(msg)
            | WordSaverError::ProviderUnavailable(msg)
            | WordSaverError::StorageFailure(msg)
            | WordSaverError::NotFound(msg)
            | WordSaverError::ConfigError(msg)
            | WordSaverError::SerializationError(msg)
            | WordSaverError::TimeoutError(msg)
            | WordSaverError::ServerError(msg) => msg,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl From<std::io::Error> for WordSaverError {
    fn from(error: std::io::Error) -> Self {
        WordSaverError::StorageFailure(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for WordSaverError {
    fn from(error: serde_json::Error) -> Self {
        WordSaverError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for WordSaverError {
    fn from(error: toml::de::Error) -> Self {
        WordSaverError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<reqwest::Error> for WordSaverError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            WordSaverError::TimeoutError(format!("请求超时: {}", error))
        } else {
            WordSaverError::ProviderUnavailable(format!("网络错误: {}", error))
        }
    }
}

impl From<tokio::time::error::Elapsed> for WordSaverError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        WordSaverError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type WordSaverResult<T> = Result<T, WordSaverError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &WordSaverError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("{}", error),
            ErrorSeverity::Warning => tracing::warn!("{}", error),
            ErrorSeverity::Error => tracing::error!("{}", error),
            ErrorSeverity::Critical => tracing::error!("严重错误: {}", error),
        }
    }

    /// 创建输入验证错误
    pub fn invalid_argument<T: fmt::Display>(msg: T) -> WordSaverError {
        WordSaverError::InvalidArgument(msg.to_string())
    }

    /// 创建存储错误
    pub fn storage_failure<T: fmt::Display>(msg: T) -> WordSaverError {
        WordSaverError::StorageFailure(msg.to_string())
    }

    /// 创建翻译服务错误
    pub fn provider_unavailable<T: fmt::Display>(msg: T) -> WordSaverError {
        WordSaverError::ProviderUnavailable(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> WordSaverError {
        WordSaverError::ConfigError(msg.to_string())
    }
}
