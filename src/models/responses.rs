//! page-query 的结构化返回类型
//!
//! 这些类型同时决定发给模型的 JSON schema（字段文档即 schema 描述）。

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 所有结构化返回都带有可选的 `error` 字段
pub trait ModelResponse: DeserializeOwned + JsonSchema {
    fn error(&self) -> Option<&str>;
}

macro_rules! impl_model_response {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ModelResponse for $ty {
                fn error(&self) -> Option<&str> {
                    self.error.as_deref().filter(|e| !e.trim().is_empty())
                }
            }
        )*
    };
}

/// 登录检测结果
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IsLoggedInResponse {
    /// Use this field to indicate whether the user is logged in.
    #[serde(default)]
    pub is_logged_in: bool,
    /// If you cannot fulfill the request, use this field to report the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// YC 批次列表
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct YcBatchesResponse {
    /// Batch names such as "S24" or "W23".
    #[serde(default)]
    pub batches: Vec<String>,
    /// If you cannot fulfill the request, use this field to report the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// YC 公司
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct Company {
    /// The company name exactly as shown.
    pub name: String,
    /// The full location if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// The full Y Combinator company URL.
    pub link: String,
}

/// 某批次下的公司列表
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CompaniesInBatchResponse {
    #[serde(default)]
    pub companies: Vec<Company>,
    /// If you cannot fulfill the request, use this field to report the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 公司的 LinkedIn 主页
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CompanyLinkedInUrlResponse {
    /// The LinkedIn profile URL or null if not found.
    #[serde(rename = "linkedInProfileUrl", default)]
    pub linked_in_profile_url: Option<String>,
    /// If you cannot fulfill the request, use this field to report the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl_model_response!(
    IsLoggedInResponse,
    YcBatchesResponse,
    CompaniesInBatchResponse,
    CompanyLinkedInUrlResponse,
);
