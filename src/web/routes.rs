//! Web 路由定义

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers, types::AppState};

/// 创建路由
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/message", post(handlers::handle_message))
        .route("/api/cache/stats", get(handlers::get_cache_stats))
        .route("/api/ping", get(handlers::ping))
}
