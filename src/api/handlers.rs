//! HTTP handlers
//!
//! 每个请求按请求里的 API key 构建自己的 [`EmployeeFlow`]。
//! 请求体按字符串读取后再解析，格式错误统一走校验错误信封。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::error::{AppError, AppResult, ValidationError};
use crate::workflow::{ContinueResponse, EmployeeFlow, ProcessBatchResponse, StartResponse};

/// terminate-session 要求的最短 API key 长度
const MIN_TERMINATE_API_KEY_LEN: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub api_key: String,
    #[serde(default)]
    pub profile_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequest {
    pub api_key: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBatchRequest {
    pub api_key: String,
    pub session_id: String,
    pub batch: String,
    #[serde(default)]
    pub parallelism: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateSessionRequest {
    pub api_key: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TerminateSessionResponse {
    pub ok: bool,
}

fn parse_body<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| ValidationError::Malformed(e).into())
}

fn require_non_empty(field: &'static str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(field, "不能为空"));
    }
    Ok(())
}

/// sessionId 会拼进 Airtop 的 REST 路径，只允许字母、数字、`-` 和 `_`
fn require_session_id(value: &str) -> AppResult<()> {
    require_non_empty("sessionId", value)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(AppError::invalid_field("sessionId", "只能包含字母、数字、- 和 _"));
    }
    Ok(())
}

impl StartRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("apiKey", &self.api_key)
    }
}

impl ContinueRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("apiKey", &self.api_key)?;
        require_session_id(&self.session_id)
    }
}

impl ProcessBatchRequest {
    fn validate(&self) -> AppResult<()> {
        require_non_empty("apiKey", &self.api_key)?;
        require_session_id(&self.session_id)?;
        require_non_empty("batch", &self.batch)?;
        if self.parallelism == Some(0) {
            return Err(AppError::invalid_field("parallelism", "必须大于 0"));
        }
        Ok(())
    }
}

impl TerminateSessionRequest {
    fn validate(&self) -> AppResult<()> {
        if self.api_key.chars().count() < MIN_TERMINATE_API_KEY_LEN {
            return Err(AppError::invalid_field(
                "apiKey",
                format!("长度至少为 {}", MIN_TERMINATE_API_KEY_LEN),
            ));
        }
        require_session_id(&self.session_id)
    }
}

pub async fn health() -> &'static str {
    "ok"
}

/// POST /api/start
pub async fn start(State(state): State<Arc<AppState>>, body: String) -> Result<Json<StartResponse>, ApiError> {
    info!("[api/start] 收到请求");
    let request: StartRequest = parse_body(&body)?;
    request.validate()?;

    let flow = EmployeeFlow::for_api_key(&request.api_key, &state.config)?;
    let profile_id = request.profile_id.as_deref().filter(|id| !id.trim().is_empty());
    Ok(Json(flow.start(profile_id).await?))
}

/// POST /api/continue
pub async fn continue_after_sign_in(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ContinueResponse>, ApiError> {
    info!("[api/continue] 收到请求");
    let request: ContinueRequest = parse_body(&body)?;
    request.validate()?;

    let flow = EmployeeFlow::for_api_key(&request.api_key, &state.config)?;
    Ok(Json(flow.continue_after_sign_in(&request.session_id).await?))
}

/// POST /api/process-batch
pub async fn process_batch(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ProcessBatchResponse>, ApiError> {
    let request: ProcessBatchRequest = parse_body(&body)?;
    info!("[api/process-batch] 批次 {} 会话 {}", request.batch, request.session_id);
    request.validate()?;

    let flow = EmployeeFlow::for_api_key(&request.api_key, &state.config)?;
    let response = flow
        .process_batch(&request.session_id, &request.batch, request.parallelism)
        .await?;
    Ok(Json(response))
}

/// POST /api/terminate-session
pub async fn terminate_session(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<TerminateSessionResponse>, ApiError> {
    let request: TerminateSessionRequest = parse_body(&body)?;
    request.validate()?;

    info!("[api/terminate-session] 终止会话 {}", request.session_id);
    let flow = EmployeeFlow::for_api_key(&request.api_key, &state.config)?;
    flow.terminate(&request.session_id).await?;
    Ok(Json(TerminateSessionResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_batch_validation() {
        let request: ProcessBatchRequest =
            parse_body(r#"{"apiKey": "k", "sessionId": "s-1", "batch": "S24", "parallelism": 0}"#).unwrap();
        assert_eq!(request.validate().unwrap_err().kind(), "ZodError");

        let request: ProcessBatchRequest =
            parse_body(r#"{"apiKey": "k", "sessionId": "s-1", "batch": "S24"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.parallelism, None);
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let err = parse_body::<ContinueRequest>(r#"{"apiKey": "k"}"#).unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::Malformed(_))));
    }

    #[test]
    fn test_session_id_must_be_path_safe() {
        for bad in ["x/windows/y", "s-1?force=1", "s-1#w", "../s-1", "s 1"] {
            let request = ContinueRequest {
                api_key: "k".into(),
                session_id: bad.into(),
            };
            assert_eq!(request.validate().unwrap_err().kind(), "ZodError", "{}", bad);
        }

        let request = ContinueRequest {
            api_key: "k".into(),
            session_id: "0b6c2a1e-7f3d-4e21-9c55-2f1d7a9e4b10".into(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_terminate_requires_long_api_key() {
        let short = TerminateSessionRequest {
            api_key: "123456789".into(),
            session_id: "s-1".into(),
        };
        assert!(short.validate().is_err());

        let ok = TerminateSessionRequest {
            api_key: "1234567890".into(),
            session_id: "s-1".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
