//! Web 模块的数据类型定义

use std::sync::Arc;

use crate::background::BackgroundService;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BackgroundService>,
}

impl AppState {
    pub fn new(service: Arc<BackgroundService>) -> Self {
        Self { service }
    }
}

/// Web 服务器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl WebConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl From<&crate::config::WordSaverConfig> for WebConfig {
    fn from(config: &crate::config::WordSaverConfig) -> Self {
        Self {
            bind_addr: config.bind_addr.clone(),
            port: config.port,
        }
    }
}
