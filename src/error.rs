use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// Airtop 后端错误
    #[error("Airtop错误: {0}")]
    Airtop(#[from] AirtopError),
    /// 页面提取错误（LLM 结构化结果）
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 请求校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// Airtop API 调用错误
#[derive(Debug, Error)]
pub enum AirtopError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 响应体无法解析
    #[error("响应解析失败 ({endpoint}): {source}")]
    DecodeFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 构造请求 URL 失败
    #[error("无效的URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// 页面提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// page-query 返回空字符串
    #[error("模型返回为空 ({operation})")]
    EmptyModelResponse { operation: &'static str },
    /// page-query 返回的内容不是预期的 JSON
    #[error("模型返回内容无法解析 ({operation}): {source}")]
    InvalidModelResponse {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// 模型在结构化结果的 error 字段中报告了问题
    #[error("{message}")]
    ModelReported { message: String },
    /// 缺少可用的浏览器 profile
    #[error("没有可用的 LinkedIn profile ID，无法继续")]
    MissingProfileId,
}

/// 请求校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 请求体不是合法 JSON 或字段类型不符
    #[error("请求体格式错误: {0}")]
    Malformed(#[source] serde_json::Error),
    /// 字段值不合法
    #[error("字段 {field} 不合法: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 未提供 API key
    #[error("未提供 Airtop API key")]
    MissingApiKey,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Airtop(AirtopError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建字段校验错误
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::Validation(ValidationError::InvalidField {
            field,
            reason: reason.into(),
        })
    }

    /// 错误类别，用于 HTTP 错误信封的 `type` 字段
    ///
    /// 请求校验失败沿用前端已识别的 `ZodError`。
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ZodError",
            AppError::Airtop(_) => "AirtopError",
            _ => "Error",
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_reported_message_is_verbatim() {
        let err = ExtractionError::ModelReported {
            message: "page not loaded".to_string(),
        };
        assert_eq!(err.to_string(), "page not loaded");

        let app: AppError = err.into();
        assert_eq!(app.kind(), "Error");
        assert!(app.to_string().ends_with("page not loaded"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AppError::invalid_field("apiKey", "empty").kind(), "ZodError");
        let airtop = AppError::Airtop(AirtopError::BadResponse {
            endpoint: "/sessions".to_string(),
            status: 401,
            message: "unauthorized".to_string(),
        });
        assert_eq!(airtop.kind(), "AirtopError");
        assert_eq!(AppError::Config(ConfigError::MissingApiKey).kind(), "Error");
    }
}
