//! API 处理器

use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use crate::background::{Request, Response};
use crate::web::types::AppState;

/// 处理扩展消息
///
/// 请求体为带 `action` 字段的 JSON；无法识别的请求返回 400 和 `{error}`。
pub async fn handle_message(
    State(state): State<AppState>,
    ExtractJson(body): ExtractJson<Value>,
) -> Result<Json<Response>, (StatusCode, Json<Response>)> {
    let request: Request = serde_json::from_value(body).map_err(|e| {
        tracing::warn!("无效的请求: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(Response::failure(format!("无效的请求: {}", e))),
        )
    })?;

    Ok(Json(state.service.handle(request).await))
}

/// 获取缓存统计信息
pub async fn get_cache_stats(State(state): State<AppState>) -> Json<Response> {
    Json(state.service.handle(Request::GetCacheStats).await)
}

/// 健康检查
pub async fn ping() -> Json<Response> {
    Json(Response::pong())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::json;

    use crate::background::BackgroundService;
    use crate::cache::{DictionaryCache, TranslationCache};
    use crate::store::MemoryStore;
    use crate::translation::{ProviderChain, StaticLinkProvider, Translator, TranslatorOptions};

    fn state() -> AppState {
        let translation_cache = Arc::new(Mutex::new(TranslationCache::new()));
        let dictionary_cache = Arc::new(Mutex::new(DictionaryCache::new()));
        let chain = ProviderChain::new(Duration::from_secs(1)).with_provider(Arc::new(StaticLinkProvider::new("en", "zh-CN")));
        let translator = Translator::new(
            chain,
            translation_cache.clone(),
            dictionary_cache.clone(),
            TranslatorOptions {
                target_lang: "zh-CN".to_string(),
                enrich_with_definition: false,
                definition_timeout: Duration::from_secs(1),
            },
        );
        let service = BackgroundService::new(Arc::new(MemoryStore::new()), translator, translation_cache, dictionary_cache);
        AppState::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_message_round_trip() {
        let state = state();
        let Json(response) = handle_message(
            State(state.clone()),
            ExtractJson(json!({"action": "saveWord", "word": "apple", "source": {"url": "u", "title": "t"}})),
        )
        .await
        .unwrap();
        assert_eq!(serde_json::to_value(response).unwrap(), json!({"success": true, "exists": false}));

        let Json(response) = handle_message(State(state), ExtractJson(json!({"action": "performSearch", "searchTerm": "app"})))
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["results"][0]["word"], "apple");
    }

    #[tokio::test]
    async fn test_unknown_action_is_bad_request() {
        let result = handle_message(State(state()), ExtractJson(json!({"action": "nope"}))).await;
        let (status, Json(body)) = result.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.is_success());
    }

    #[tokio::test]
    async fn test_ping_and_cache_stats() {
        let Json(pong) = ping().await;
        assert_eq!(serde_json::to_value(pong).unwrap(), json!({"success": true, "action": "pong"}));

        let Json(stats) = get_cache_stats(State(state())).await;
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["translation"]["maxSize"], 500);
        assert_eq!(value["dictionary"]["maxSize"], 300);
    }
}
