//! 流水线上下文
//!
//! 封装"我正在处理哪个会话的哪个批次"这一信息，只用于日志。

use std::fmt::Display;

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    CreateSession,
    CheckLogin,
    NeedSignIn,
    FetchBatches,
    SelectBatch,
    FetchCompanies,
    FetchCompanyLinkedinUrls,
    FetchEmployeeListUrls,
    FetchEmployeeProfileUrls,
    Terminate,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::CreateSession => "CREATE_SESSION",
            PipelineStage::CheckLogin => "CHECK_LOGIN",
            PipelineStage::NeedSignIn => "NEED_SIGN_IN",
            PipelineStage::FetchBatches => "FETCH_BATCHES",
            PipelineStage::SelectBatch => "SELECT_BATCH",
            PipelineStage::FetchCompanies => "FETCH_COMPANIES",
            PipelineStage::FetchCompanyLinkedinUrls => "FETCH_COMPANY_LINKEDIN_URLS",
            PipelineStage::FetchEmployeeListUrls => "FETCH_EMPLOYEE_LIST_URLS",
            PipelineStage::FetchEmployeeProfileUrls => "FETCH_EMPLOYEE_PROFILE_URLS",
            PipelineStage::Terminate => "TERMINATE",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 流水线上下文
#[derive(Debug, Clone, Default)]
pub struct PipelineCtx {
    /// Airtop 会话 ID
    pub session_id: String,

    /// 持久化的浏览器 profile
    pub profile_id: Option<String>,

    /// 当前处理的 YC 批次
    pub batch: Option<String>,
}

impl PipelineCtx {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    pub fn with_profile(mut self, profile_id: Option<String>) -> Self {
        self.profile_id = profile_id;
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }
}

impl Display for PipelineCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[会话 #{}", self.session_id)?;
        if let Some(profile_id) = &self.profile_id {
            write!(f, " profile#{}", profile_id)?;
        }
        if let Some(batch) = &self.batch {
            write!(f, " 批次#{}", batch)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = PipelineCtx::new("s-1")
            .with_profile(Some("p-1".to_string()))
            .with_batch("S24");
        assert_eq!(ctx.to_string(), "[会话 #s-1 profile#p-1 批次#S24]");
        assert_eq!(PipelineCtx::new("s-2").to_string(), "[会话 #s-2]");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::FetchCompanyLinkedinUrls.to_string(), "FETCH_COMPANY_LINKEDIN_URLS");
        assert_eq!(PipelineStage::NeedSignIn.to_string(), "NEED_SIGN_IN");
    }
}
