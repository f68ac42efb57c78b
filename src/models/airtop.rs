//! Airtop 会话 / 窗口数据结构

use serde::{Deserialize, Serialize};

/// 远程浏览器会话
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// 会话结束后持久化的 profile（cookie / 登录态）
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub cdp_ws_url: Option<String>,
}

/// 创建会话时的配置
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub timeout_minutes: u32,
    pub persist_profile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_profile_id: Option<String>,
}

impl SessionConfig {
    pub fn new(timeout_minutes: u32) -> Self {
        Self {
            timeout_minutes,
            persist_profile: true,
            base_profile_id: None,
        }
    }

    pub fn with_base_profile(mut self, profile_id: Option<String>) -> Self {
        self.base_profile_id = profile_id.filter(|id| !id.trim().is_empty());
        self
    }
}

/// 新建窗口返回的句柄
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowHandle {
    pub window_id: String,
    #[serde(default)]
    pub target_id: Option<String>,
}

/// 窗口信息（含 live view 地址）
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    pub window_id: String,
    pub live_view_url: String,
}

/// LinkedIn 阶段使用哪个会话
///
/// `Profile` 时由服务自己创建一个基于该 profile 的会话，阶段结束后终止。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    Session(String),
    Profile(String),
}

impl std::fmt::Display for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionSource::Session(id) => write!(f, "session#{}", id),
            SessionSource::Profile(id) => write!(f, "profile#{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_serialization() {
        let config = SessionConfig::new(15).with_base_profile(Some("prof-1".to_string()));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"timeoutMinutes": 15, "persistProfile": true, "baseProfileId": "prof-1"})
        );

        let blank = SessionConfig::new(10).with_base_profile(Some("  ".to_string()));
        let json = serde_json::to_value(&blank).unwrap();
        assert!(json.get("baseProfileId").is_none());
    }

    #[test]
    fn test_session_deserialize_with_missing_optionals() {
        let session: Session = serde_json::from_str(r#"{"id": "s-1"}"#).unwrap();
        assert_eq!(session.id, "s-1");
        assert!(session.profile_id.is_none());
        assert!(session.cdp_ws_url.is_none());
    }
}
