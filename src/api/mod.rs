//! HTTP API 模块
//!
//! ```text
//! POST /api/start             - 创建会话，检查 LinkedIn 登录
//! POST /api/continue          - 用户登录后继续
//! POST /api/process-batch     - 处理一个 YC 批次
//! POST /api/terminate-session - 终止会话
//! GET  /health                - 健康检查
//! ```

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;

pub use error::{ApiError, ErrorEnvelope};

/// 路由共享状态（只有配置，Airtop 客户端按请求创建）
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/start", post(handlers::start))
        .route("/api/continue", post(handlers::continue_after_sign_in))
        .route("/api/process-batch", post(handlers::process_batch))
        .route("/api/terminate-session", post(handlers::terminate_session))
        .with_state(state)
}

/// 启动 HTTP 服务
pub async fn serve(config: Config, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("🌐 HTTP 服务已启动: http://{}", listener.local_addr()?);

    let router = create_router(Arc::new(AppState { config }));
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = Config {
            // 不可达地址，校验失败的请求不应访问后端
            airtop_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        create_router(Arc::new(AppState { config }))
    }

    async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_start_rejects_empty_api_key() {
        let (status, body) = post_json(test_router(), "/api/start", serde_json::json!({"apiKey": ""})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["type"], "ZodError");
        assert!(body["error"]["message"].as_str().unwrap().contains("apiKey"));
    }

    #[tokio::test]
    async fn test_process_batch_missing_batch() {
        let (status, body) = post_json(
            test_router(),
            "/api/process-batch",
            serde_json::json!({"apiKey": "key", "sessionId": "s-1"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["type"], "ZodError");
    }

    #[tokio::test]
    async fn test_terminate_short_api_key() {
        let (status, body) = post_json(
            test_router(),
            "/api/terminate-session",
            serde_json::json!({"apiKey": "short", "sessionId": "s-1"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["type"], "ZodError");
    }

    #[tokio::test]
    async fn test_terminate_rejects_path_like_session_id() {
        let (status, body) = post_json(
            test_router(),
            "/api/terminate-session",
            serde_json::json!({"apiKey": "long-enough-key", "sessionId": "x/windows/y"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["type"], "ZodError");
        assert!(body["error"]["message"].as_str().unwrap().contains("sessionId"));
    }
}
