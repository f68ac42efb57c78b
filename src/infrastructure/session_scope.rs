//! 会话作用域 - 基础设施层
//!
//! 记录一个阶段内打开的窗口（以及自己创建的会话）。
//! 每个窗口用完即由 `close_window()` 关闭并注销，`close()` 只负责兜底释放剩余资源。
//! 调用方的写法固定为：
//!
//! ```text
//! let scope = SessionScope::...;
//! let result = work(&scope).await;
//! scope.close().await;
//! result
//! ```
//!
//! 这样成功和出错两条路径都会走到 `close()`。

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::infrastructure::AirtopClient;
use crate::models::{SessionConfig, SessionSource, WindowHandle};

/// 会话作用域
pub struct SessionScope<'a> {
    client: &'a AirtopClient,
    session_id: String,
    /// 会话由本作用域创建，close 时终止
    owns_session: bool,
    windows: Mutex<Vec<String>>,
}

impl<'a> SessionScope<'a> {
    /// 借用一个已存在的会话，close 时只关闭窗口
    pub fn borrowed(client: &'a AirtopClient, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: session_id.into(),
            owns_session: false,
            windows: Mutex::new(Vec::new()),
        }
    }

    /// 创建一个新会话，close 时终止它
    pub async fn create(client: &'a AirtopClient, config: &SessionConfig) -> AppResult<Self> {
        let session = client.create_session(config).await?;
        debug!("作用域创建会话: {}", session.id);
        Ok(Self {
            client,
            session_id: session.id,
            owns_session: true,
            windows: Mutex::new(Vec::new()),
        })
    }

    /// 按来源打开作用域：已有会话直接借用，profile 则新建会话
    pub async fn from_source(
        client: &'a AirtopClient,
        source: &SessionSource,
        timeout_minutes: u32,
    ) -> AppResult<Self> {
        match source {
            SessionSource::Session(id) => Ok(Self::borrowed(client, id.clone())),
            SessionSource::Profile(profile_id) => {
                let config =
                    SessionConfig::new(timeout_minutes).with_base_profile(Some(profile_id.clone()));
                Self::create(client, &config).await
            }
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn client(&self) -> &AirtopClient {
        self.client
    }

    /// 打开窗口并登记，close 时关闭
    pub async fn open_window(&self, url: &str) -> AppResult<WindowHandle> {
        let window = self.client.create_window(&self.session_id, url).await?;
        self.windows.lock().await.push(window.window_id.clone());
        Ok(window)
    }

    /// 关闭窗口并注销；失败只记录日志
    pub async fn close_window(&self, window_id: &str) {
        self.windows.lock().await.retain(|id| id != window_id);
        if let Err(e) = self.client.close_window(&self.session_id, window_id).await {
            warn!("关闭窗口 {} 失败: {}", window_id, e);
        }
    }

    #[cfg(test)]
    pub async fn open_window_count(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// 释放资源：关闭所有登记的窗口，若会话归本作用域所有则终止会话
    ///
    /// 释放失败只记录日志，不覆盖调用方的结果。
    pub async fn close(self) {
        let windows = std::mem::take(&mut *self.windows.lock().await);

        if self.owns_session {
            // 终止会话会一并关闭其中的窗口
            if let Err(e) = self.client.terminate_session(&self.session_id).await {
                warn!("终止会话 {} 失败: {}", self.session_id, e);
            }
            return;
        }

        for window_id in windows {
            if let Err(e) = self.client.close_window(&self.session_id, &window_id).await {
                warn!("关闭窗口 {} 失败: {}", window_id, e);
            }
        }
    }
}
