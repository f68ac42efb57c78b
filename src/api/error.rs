//! HTTP 错误信封
//!
//! 所有错误统一返回 500：`{"type": "...", "error": {"message": "..."}}`
//!
//! `type` 取值：`ZodError`（请求校验失败）、`AirtopError`、`Error`。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub error: ErrorBody,
}

impl From<&AppError> for ErrorEnvelope {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind().to_string(),
            error: ErrorBody {
                message: err.to_string(),
            },
        }
    }
}

/// handler 的错误类型
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("❌ 请求失败 [{}]: {}", self.0.kind(), self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorEnvelope::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AirtopError;

    #[test]
    fn test_envelope_shape() {
        let err = AppError::Airtop(AirtopError::BadResponse {
            endpoint: "/sessions".into(),
            status: 401,
            message: "invalid api key".into(),
        });
        let value = serde_json::to_value(ErrorEnvelope::from(&err)).unwrap();
        assert_eq!(value["type"], "AirtopError");
        assert!(value["error"]["message"].as_str().unwrap().contains("invalid api key"));
    }

    #[test]
    fn test_response_status_is_500() {
        let response = ApiError(AppError::invalid_field("batch", "不能为空")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
