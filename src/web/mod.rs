//! Web 服务器模块
//!
//! 以本地 HTTP 服务承载后台服务，扩展通过 `POST /api/message` 发送消息。

pub mod handlers;
pub mod routes;
pub mod types;

pub use routes::create_routes;
pub use types::{AppState, WebConfig};

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::background::BackgroundService;
use crate::error::{WordSaverError, WordSaverResult};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    service: Arc<BackgroundService>,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, service: Arc<BackgroundService>) -> Self {
        Self { config, service }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> WordSaverResult<()> {
        let app = create_router(AppState::new(self.service.clone()));

        let listener = tokio::net::TcpListener::bind(self.config.address())
            .await
            .map_err(|e| WordSaverError::ServerError(format!("无法绑定地址 {}: {}", self.config.address(), e)))?;

        tracing::info!("WordSaver 服务启动: http://{}", self.config.address());

        axum::serve(listener, app)
            .await
            .map_err(|e| WordSaverError::ServerError(format!("axum 服务异常退出: {}", e)))?;

        Ok(())
    }
}

/// 创建带 CORS 的路由器
pub fn create_router(state: AppState) -> Router {
    create_routes().with_state(state).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::cache::{DictionaryCache, TranslationCache};
    use crate::error::ErrorSeverity;
    use crate::store::MemoryStore;
    use crate::translation::{ProviderChain, Translator, TranslatorOptions};

    fn service() -> Arc<BackgroundService> {
        let translation_cache = Arc::new(Mutex::new(TranslationCache::new()));
        let dictionary_cache = Arc::new(Mutex::new(DictionaryCache::new()));
        let translator = Translator::new(
            ProviderChain::new(Duration::from_secs(1)),
            translation_cache.clone(),
            dictionary_cache.clone(),
            TranslatorOptions {
                target_lang: "zh-CN".to_string(),
                enrich_with_definition: false,
                definition_timeout: Duration::from_secs(1),
            },
        );
        Arc::new(BackgroundService::new(
            Arc::new(MemoryStore::new()),
            translator,
            translation_cache,
            dictionary_cache,
        ))
    }

    #[tokio::test]
    async fn test_bind_failure_is_server_error() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let server = WebServer::new(
            WebConfig {
                bind_addr: "127.0.0.1".to_string(),
                port,
            },
            service(),
        );

        let error = server.start().await.unwrap_err();
        assert!(matches!(error, WordSaverError::ServerError(_)), "{}", error);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(!error.is_retryable());
        assert!(error.to_string().starts_with("服务器错误"));
    }
}
