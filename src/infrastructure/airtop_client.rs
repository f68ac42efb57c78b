//! Airtop REST 客户端 - 基础设施层
//!
//! 持有 HTTP 连接和 API key，只暴露会话 / 窗口 / page-query / scrape 能力，
//! 不认识 YC 或 LinkedIn。

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AirtopError, AppError, AppResult};
use crate::models::{Session, SessionConfig, WindowHandle, WindowInfo};

/// Airtop 响应统一包在 `data` 里
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageQueryData {
    #[serde(default)]
    model_response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeData {
    model_response: ScrapeModelResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeModelResponse {
    scraped_content: ScrapedContent,
}

#[derive(Debug, Deserialize)]
struct ScrapedContent {
    #[serde(default)]
    text: String,
}

/// Airtop API 客户端
#[derive(Clone)]
pub struct AirtopClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AirtopClient {
    /// 为某个 API key 创建客户端（每个请求一个，不做全局缓存）
    pub fn new(api_key: impl Into<String>, config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::request_failed("client", e))?;

        Ok(Self {
            http,
            base_url: config.airtop_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
    }

    /// 发送请求，检查状态码，返回原始响应体
    async fn send_raw(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<String> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        if !status.is_success() {
            warn!("Airtop 返回错误状态 {} ({})", status, endpoint);
            return Err(AirtopError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: error_message(status, &body),
            }
            .into());
        }

        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<T> {
        let body = self.send_raw(builder, endpoint).await?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|source| AirtopError::DecodeFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(envelope.data)
    }

    /// 创建会话
    pub async fn create_session(&self, config: &SessionConfig) -> AppResult<Session> {
        let endpoint = "/sessions";
        debug!("创建会话: {:?}", config);
        let builder = self
            .request(Method::POST, endpoint)
            .json(&json!({ "configuration": config }));
        self.send(builder, endpoint).await
    }

    /// 获取会话信息
    pub async fn get_session(&self, session_id: &str) -> AppResult<Session> {
        let endpoint = format!("/sessions/{}", session_id);
        self.send(self.request(Method::GET, &endpoint), &endpoint).await
    }

    /// 终止会话（profile 在此时持久化）
    pub async fn terminate_session(&self, session_id: &str) -> AppResult<()> {
        let endpoint = format!("/sessions/{}", session_id);
        debug!("终止会话: {}", session_id);
        self.send_raw(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
            .map(|_| ())
    }

    /// 在会话中打开一个窗口并导航到 url
    pub async fn create_window(&self, session_id: &str, url: &str) -> AppResult<WindowHandle> {
        let endpoint = format!("/sessions/{}/windows", session_id);
        debug!("打开窗口: {}", url);
        let builder = self
            .request(Method::POST, &endpoint)
            .json(&json!({ "url": url }));
        self.send(builder, &endpoint).await
    }

    /// 获取窗口信息（live view 地址）
    pub async fn get_window_info(&self, session_id: &str, window_id: &str) -> AppResult<WindowInfo> {
        let endpoint = format!("/sessions/{}/windows/{}", session_id, window_id);
        self.send(self.request(Method::GET, &endpoint), &endpoint).await
    }

    /// 关闭窗口
    pub async fn close_window(&self, session_id: &str, window_id: &str) -> AppResult<()> {
        let endpoint = format!("/sessions/{}/windows/{}", session_id, window_id);
        self.send_raw(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
            .map(|_| ())
    }

    /// 对当前页面运行 prompt，返回模型的原始字符串结果
    pub async fn page_query(
        &self,
        session_id: &str,
        window_id: &str,
        prompt: &str,
        output_schema: &JsonValue,
    ) -> AppResult<String> {
        let endpoint = format!("/sessions/{}/windows/{}/page-query", session_id, window_id);
        let body = json!({
            "prompt": prompt,
            "configuration": { "outputSchema": output_schema.to_string() },
        });
        let data: PageQueryData = self
            .send(self.request(Method::POST, &endpoint).json(&body), &endpoint)
            .await?;
        Ok(data.model_response)
    }

    /// 抓取页面的原始文本
    pub async fn scrape_content(&self, session_id: &str, window_id: &str) -> AppResult<String> {
        let endpoint = format!("/sessions/{}/windows/{}/scrape-content", session_id, window_id);
        let data: ScrapeData = self
            .send(self.request(Method::POST, &endpoint).json(&json!({})), &endpoint)
            .await?;
        Ok(data.model_response.scraped_content.text)
    }
}

/// 从错误响应体中取出可读信息
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AirtopClient {
        let config = Config {
            airtop_base_url: server.uri(),
            ..Config::default()
        };
        AirtopClient::new("test-api-key", &config).unwrap()
    }

    #[tokio::test]
    async fn test_create_session_sends_configuration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "configuration": {"timeoutMinutes": 15, "persistProfile": true, "baseProfileId": "p-1"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": "s-1", "profileId": "p-1", "cdpWsUrl": "wss://cdp"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = client
            .create_session(&SessionConfig::new(15).with_base_profile(Some("p-1".into())))
            .await
            .unwrap();
        assert_eq!(session.id, "s-1");
        assert_eq!(session.profile_id.as_deref(), Some("p-1"));
    }

    #[tokio::test]
    async fn test_scrape_content_extracts_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions/s-1/windows/w-1/scrape-content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"modelResponse": {"scrapedContent": {"text": "hello", "contentType": "text/plain"}}}
            })))
            .mount(&server)
            .await;

        let text = client_for(&server).scrape_content("s-1", "w-1").await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_bad_status_is_airtop_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "session not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get_session("missing").await.unwrap_err();
        match err {
            AppError::Airtop(AirtopError::BadResponse { status, message, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "session not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions/s-1/windows"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_window("s-1", "https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Airtop(AirtopError::DecodeFailed { .. })));
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
        assert_eq!(error_message(StatusCode::BAD_REQUEST, "plain text"), "plain text");
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error": "bad schema"}"#),
            "bad schema"
        );
    }
}
