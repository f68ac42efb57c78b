//! YC 员工主页提取流程 - 流程层
//!
//! 核心职责：定义"一次运行"的完整处理流程
//!
//! 流程顺序：
//! 1. CREATE_SESSION → CHECK_LOGIN（未登录 → NEED_SIGN_IN，等待用户）
//! 2. FETCH_BATCHES → SELECT_BATCH → FETCH_COMPANIES → FETCH_COMPANY_LINKEDIN_URLS
//! 3. FETCH_EMPLOYEE_LIST_URLS → FETCH_EMPLOYEE_PROFILE_URLS → TERMINATE
//!
//! 会话清理：
//! - 出错时尽力终止会话，返回原始错误
//! - `process_batch` 成功后终止会话
//! - `start` / `continue` 成功以及需要登录时保留会话，后续调用还要用

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::infrastructure::AirtopClient;
use crate::models::{Company, Session, SessionConfig, SessionSource};
use crate::services::{BatchOptions, LinkedInExtractorService, YcExtractorService};
use crate::workflow::pipeline_ctx::{PipelineCtx, PipelineStage};

/// `start` / `continue` 的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_view_url: Option<String>,
    pub sign_in_required: bool,
    /// 已登录时返回可选批次
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batches: Option<Vec<String>>,
}

pub type ContinueResponse = StartResponse;

/// `process_batch` 的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessBatchResponse {
    pub session_id: String,
    /// 员工主页 URL 数组（格式化的 JSON）
    pub content: String,
    pub sign_in_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_view_url: Option<String>,
}

/// 员工提取流程
///
/// - 编排 YC 与 LinkedIn 两个服务
/// - 决定何时检查登录、何时终止会话
/// - 每个请求一个实例，不做全局缓存
pub struct EmployeeFlow {
    client: AirtopClient,
    yc: YcExtractorService,
    linkedin: LinkedInExtractorService,
    session_timeout_minutes: u32,
    batch_options: BatchOptions,
}

impl EmployeeFlow {
    pub fn new(client: AirtopClient, config: &Config) -> Self {
        Self {
            yc: YcExtractorService::new(client.clone()),
            linkedin: LinkedInExtractorService::new(client.clone(), config.session_timeout_minutes),
            client,
            session_timeout_minutes: config.session_timeout_minutes,
            batch_options: BatchOptions::from_config(config),
        }
    }

    /// 用调用方提供的 API key 创建流程
    pub fn for_api_key(api_key: &str, config: &Config) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        let client = AirtopClient::new(api_key.trim(), config)?;
        Ok(Self::new(client, config))
    }

    pub fn yc(&self) -> &YcExtractorService {
        &self.yc
    }

    pub fn linkedin(&self) -> &LinkedInExtractorService {
        &self.linkedin
    }

    pub fn batch_options(&self) -> BatchOptions {
        self.batch_options
    }

    fn enter(&self, stage: PipelineStage, ctx: &PipelineCtx) {
        info!("{} ▶ {}", ctx, stage);
    }

    /// 创建会话（可基于已有 profile）
    pub async fn create_session(&self, profile_id: Option<&str>) -> AppResult<Session> {
        info!("▶ {} (profile: {})", PipelineStage::CreateSession, profile_id.unwrap_or("-"));
        let config =
            SessionConfig::new(self.session_timeout_minutes).with_base_profile(profile_id.map(str::to_string));
        let session = self.client.create_session(&config).await?;
        info!("✓ 会话已创建: {}", session.id);
        Ok(session)
    }

    /// 新建会话并检查登录；已登录时直接返回批次列表
    pub async fn start(&self, profile_id: Option<&str>) -> AppResult<StartResponse> {
        let session = self.create_session(profile_id).await?;
        let ctx = PipelineCtx::new(&session.id)
            .with_profile(session.profile_id.clone().or_else(|| profile_id.map(str::to_string)));

        let result = self.login_or_batches(&ctx).await;
        self.terminate_on_error(&session.id, result).await
    }

    /// 用户在 live view 中登录后继续
    pub async fn continue_after_sign_in(&self, session_id: &str) -> AppResult<ContinueResponse> {
        let ctx = PipelineCtx::new(session_id);
        let result = self.login_or_batches(&ctx).await;
        self.terminate_on_error(session_id, result).await
    }

    /// 处理一个批次：公司 → LinkedIn 主页 → 员工列表页 → 员工主页
    pub async fn process_batch(
        &self,
        session_id: &str,
        batch: &str,
        parallelism: Option<usize>,
    ) -> AppResult<ProcessBatchResponse> {
        let ctx = PipelineCtx::new(session_id).with_batch(batch);
        let options = self.batch_options.with_parallelism(parallelism);

        match self.run_batch(&ctx, batch, options).await {
            Ok(response) if response.sign_in_required => Ok(response),
            Ok(response) => {
                self.enter(PipelineStage::Terminate, &ctx);
                if let Err(e) = self.terminate(session_id).await {
                    warn!("{} ⚠️ 结束后终止会话失败: {}", ctx, e);
                }
                Ok(response)
            }
            Err(e) => {
                error!("{} ❌ 批次处理失败: {}", ctx, e);
                self.terminate_quietly(session_id).await;
                Err(e)
            }
        }
    }

    /// 终止会话
    pub async fn terminate(&self, session_id: &str) -> AppResult<()> {
        self.client.terminate_session(session_id).await?;
        info!("✓ 会话 {} 已终止", session_id);
        Ok(())
    }

    /// 批次 → 公司 → 公司 LinkedIn 主页
    pub async fn fetch_company_linkedin_urls(
        &self,
        ctx: &PipelineCtx,
        batch: &str,
        options: BatchOptions,
    ) -> AppResult<(Vec<Company>, Vec<String>)> {
        self.enter(PipelineStage::FetchCompanies, ctx);
        let companies = self.yc.get_companies_in_batch(batch, &ctx.session_id).await?;

        self.enter(PipelineStage::FetchCompanyLinkedinUrls, ctx);
        let urls = self
            .yc
            .get_companies_linkedin_profile_urls(&companies, &ctx.session_id, options)
            .await?;
        Ok((companies, urls))
    }

    /// 公司 LinkedIn 主页 → 员工列表页 → 员工主页
    pub async fn fetch_employee_profiles(
        &self,
        ctx: &PipelineCtx,
        company_urls: &[String],
        source: &SessionSource,
        options: BatchOptions,
    ) -> AppResult<Vec<String>> {
        self.enter(PipelineStage::FetchEmployeeListUrls, ctx);
        let list_urls = self
            .linkedin
            .get_employees_list_urls(company_urls, source, options)
            .await?;

        self.enter(PipelineStage::FetchEmployeeProfileUrls, ctx);
        self.linkedin
            .get_employees_profile_urls(&list_urls, source, options)
            .await
    }

    async fn login_or_batches(&self, ctx: &PipelineCtx) -> AppResult<StartResponse> {
        self.enter(PipelineStage::CheckLogin, ctx);
        if !self.linkedin.check_if_signed_in(&ctx.session_id).await? {
            self.enter(PipelineStage::NeedSignIn, ctx);
            let live_view_url = self.linkedin.get_login_live_view_url(&ctx.session_id).await?;
            return Ok(StartResponse {
                session_id: ctx.session_id.clone(),
                profile_id: ctx.profile_id.clone(),
                live_view_url: Some(live_view_url),
                sign_in_required: true,
                batches: None,
            });
        }

        self.enter(PipelineStage::FetchBatches, ctx);
        let batches = self.yc.get_yc_batches(&ctx.session_id).await?;
        Ok(StartResponse {
            session_id: ctx.session_id.clone(),
            profile_id: ctx.profile_id.clone(),
            live_view_url: None,
            sign_in_required: false,
            batches: Some(batches),
        })
    }

    async fn run_batch(
        &self,
        ctx: &PipelineCtx,
        batch: &str,
        options: BatchOptions,
    ) -> AppResult<ProcessBatchResponse> {
        self.enter(PipelineStage::SelectBatch, ctx);
        let (_, company_urls) = self.fetch_company_linkedin_urls(ctx, batch, options).await?;

        self.enter(PipelineStage::CheckLogin, ctx);
        if !self.linkedin.check_if_signed_in(&ctx.session_id).await? {
            self.enter(PipelineStage::NeedSignIn, ctx);
            let live_view_url = self.linkedin.get_login_live_view_url(&ctx.session_id).await?;
            return Ok(ProcessBatchResponse {
                session_id: ctx.session_id.clone(),
                content: String::new(),
                sign_in_required: true,
                live_view_url: Some(live_view_url),
            });
        }

        let source = SessionSource::Session(ctx.session_id.clone());
        let profile_urls = self
            .fetch_employee_profiles(ctx, &company_urls, &source, options)
            .await?;
        info!("{} ✅ 批次完成，共 {} 个员工主页", ctx, profile_urls.len());

        Ok(ProcessBatchResponse {
            session_id: ctx.session_id.clone(),
            content: to_pretty_json(&profile_urls)?,
            sign_in_required: false,
            live_view_url: None,
        })
    }

    async fn terminate_on_error<T>(&self, session_id: &str, result: AppResult<T>) -> AppResult<T> {
        if let Err(e) = &result {
            error!("[会话 #{}] ❌ 流程失败: {}", session_id, e);
            self.terminate_quietly(session_id).await;
        }
        result
    }

    /// 尽力终止会话，失败只记录日志
    pub async fn terminate_quietly(&self, session_id: &str) {
        if let Err(e) = self.client.terminate_session(session_id).await {
            warn!("⚠️ 终止会话 {} 失败: {}", session_id, e);
        }
    }
}

pub fn to_pretty_json(urls: &[String]) -> AppResult<String> {
    serde_json::to_string_pretty(urls).map_err(|e| AppError::Other(format!("结果序列化失败: {}", e)))
}
