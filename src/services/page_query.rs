//! page-query 结果解析 - 业务能力层
//!
//! 流程固定：发送 prompt + schema → 检查空结果 → 解析 JSON → `error` 字段优先于数据。

use schemars::schema_for;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppResult, ExtractionError};
use crate::infrastructure::AirtopClient;
use crate::models::ModelResponse;
use crate::utils::logging::{truncate_text, MODEL_RESPONSE_LOG_CHARS};

/// 由返回类型生成 outputSchema
pub fn output_schema<T: ModelResponse>() -> JsonValue {
    serde_json::to_value(schema_for!(T)).unwrap_or(JsonValue::Null)
}

/// 解析模型的原始字符串结果
pub fn parse_model_response<T: ModelResponse>(raw: &str, operation: &'static str) -> AppResult<T> {
    if raw.trim().is_empty() {
        return Err(ExtractionError::EmptyModelResponse { operation }.into());
    }

    let parsed: T = serde_json::from_str(raw)
        .map_err(|source| ExtractionError::InvalidModelResponse { operation, source })?;

    if let Some(message) = parsed.error() {
        return Err(ExtractionError::ModelReported {
            message: message.to_string(),
        }
        .into());
    }

    Ok(parsed)
}

/// 对窗口执行 page-query 并解析为 `T`
pub async fn query_page<T: ModelResponse>(
    client: &AirtopClient,
    session_id: &str,
    window_id: &str,
    prompt: &str,
    operation: &'static str,
) -> AppResult<T> {
    let schema = output_schema::<T>();
    let raw = client
        .page_query(session_id, window_id, prompt, &schema)
        .await?;
    debug!("{} 模型返回: {}", operation, truncate_text(&raw, MODEL_RESPONSE_LOG_CHARS));
    parse_model_response(&raw, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{CompanyLinkedInUrlResponse, IsLoggedInResponse, YcBatchesResponse};

    #[test]
    fn test_logged_out() {
        let r: IsLoggedInResponse = parse_model_response(r#"{"isLoggedIn": false}"#, "login").unwrap();
        assert!(!r.is_logged_in);
    }

    #[test]
    fn test_error_field_takes_precedence() {
        let err = parse_model_response::<IsLoggedInResponse>(
            r#"{"isLoggedIn": true, "error": "x"}"#,
            "login",
        )
        .unwrap_err();
        match err {
            AppError::Extraction(ExtractionError::ModelReported { message }) => assert_eq!(message, "x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_and_invalid_responses() {
        let err = parse_model_response::<YcBatchesResponse>("   ", "batches").unwrap_err();
        assert!(matches!(
            err,
            AppError::Extraction(ExtractionError::EmptyModelResponse { operation: "batches" })
        ));

        let err = parse_model_response::<YcBatchesResponse>("{not json", "batches").unwrap_err();
        assert!(matches!(
            err,
            AppError::Extraction(ExtractionError::InvalidModelResponse { .. })
        ));
    }

    #[test]
    fn test_null_linkedin_url() {
        let r: CompanyLinkedInUrlResponse =
            parse_model_response(r#"{"linkedInProfileUrl": null}"#, "linkedin").unwrap();
        assert!(r.linked_in_profile_url.is_none());
    }

    #[test]
    fn test_schema_uses_wire_field_names() {
        let schema = output_schema::<IsLoggedInResponse>();
        let properties = &schema["properties"];
        assert!(properties.get("isLoggedIn").is_some());
        assert!(properties.get("error").is_some());
        assert_eq!(
            properties["isLoggedIn"]["description"],
            "Use this field to indicate whether the user is logged in."
        );
    }
}
