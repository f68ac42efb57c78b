//! YC 公司目录提取服务 - 业务能力层
//!
//! 只负责从 YC 页面上读数据：批次、批次下的公司、公司的 LinkedIn 主页。
//! 每个操作打开的窗口在操作结束时关闭。

use reqwest::Url;
use tracing::{info, warn};

use crate::error::{AirtopError, AppError, AppResult};
use crate::infrastructure::{AirtopClient, SessionScope};
use crate::models::{CompaniesInBatchResponse, Company, CompanyLinkedInUrlResponse, YcBatchesResponse};
use crate::services::batch_processor::{process_batched_urls, BatchOptions};
use crate::services::page_query::query_page;
use crate::services::prompts::{
    GET_COMPANIES_IN_BATCH_PROMPT, GET_COMPANY_LINKEDIN_PROFILE_URL_PROMPT, GET_YC_BATCHES_PROMPT,
    YC_COMPANIES_URL,
};

/// YC 提取服务
#[derive(Clone)]
pub struct YcExtractorService {
    client: AirtopClient,
}

impl YcExtractorService {
    pub fn new(client: AirtopClient) -> Self {
        Self { client }
    }

    /// 读取公司目录页上的批次列表
    pub async fn get_yc_batches(&self, session_id: &str) -> AppResult<Vec<String>> {
        info!("📚 获取 YC 批次列表");

        let session = self.client.get_session(session_id).await?;
        let scope = SessionScope::borrowed(&self.client, session.id);

        let result = async {
            let window = scope.open_window(YC_COMPANIES_URL).await?;
            query_page::<YcBatchesResponse>(
                &self.client,
                scope.session_id(),
                &window.window_id,
                GET_YC_BATCHES_PROMPT,
                "yc_batches",
            )
            .await
        }
        .await;
        scope.close().await;

        let batches = result?.batches;
        info!("✓ 共 {} 个批次: {:?}", batches.len(), batches);
        Ok(batches)
    }

    /// 读取某个批次下的公司
    pub async fn get_companies_in_batch(&self, batch: &str, session_id: &str) -> AppResult<Vec<Company>> {
        info!("🏢 获取批次 \"{}\" 的公司列表", batch);

        let url = batch_url(batch)?;
        let session = self.client.get_session(session_id).await?;
        let scope = SessionScope::borrowed(&self.client, session.id);

        let result = async {
            let window = scope.open_window(&url).await?;
            query_page::<CompaniesInBatchResponse>(
                &self.client,
                scope.session_id(),
                &window.window_id,
                GET_COMPANIES_IN_BATCH_PROMPT,
                "companies_in_batch",
            )
            .await
        }
        .await;
        scope.close().await;

        let companies = result?.companies;
        info!("✓ 批次 {} 共 {} 家公司", batch, companies.len());
        Ok(companies)
    }

    /// 为每家公司查找 LinkedIn 主页
    ///
    /// 单个公司失败只记录日志并跳过，结果保持输入顺序。
    pub async fn get_companies_linkedin_profile_urls(
        &self,
        companies: &[Company],
        session_id: &str,
        options: BatchOptions,
    ) -> AppResult<Vec<String>> {
        info!("🔗 查找 {} 家公司的 LinkedIn 主页", companies.len());

        let links: Vec<String> = companies.iter().map(|c| c.link.clone()).collect();
        let scope = SessionScope::borrowed(&self.client, session_id);
        let scope_ref = &scope;

        let result = process_batched_urls(&links, options, move |link| async move {
            match self.find_linkedin_url(scope_ref, &link).await {
                Ok(url) => Ok::<_, AppError>(url),
                Err(e) => {
                    warn!("⚠️ 获取 {} 的 LinkedIn 主页失败: {}", link, e);
                    Ok(None)
                }
            }
        })
        .await;
        scope.close().await;

        let urls: Vec<String> = result?.into_iter().flatten().collect();
        info!("✓ 找到 {} 个公司 LinkedIn 主页", urls.len());
        Ok(urls)
    }

    async fn find_linkedin_url(&self, scope: &SessionScope<'_>, company_link: &str) -> AppResult<Option<String>> {
        let window = scope.open_window(company_link).await?;
        let result = query_page::<CompanyLinkedInUrlResponse>(
            &self.client,
            scope.session_id(),
            &window.window_id,
            GET_COMPANY_LINKEDIN_PROFILE_URL_PROMPT,
            "company_linkedin_url",
        )
        .await;
        scope.close_window(&window.window_id).await;

        Ok(result?
            .linked_in_profile_url
            .filter(|url| !url.trim().is_empty()))
    }
}

/// `…/companies?batch=<batch>`，批次名做 URL 编码
fn batch_url(batch: &str) -> AppResult<String> {
    Url::parse_with_params(YC_COMPANIES_URL, &[("batch", batch)])
        .map(String::from)
        .map_err(|e| {
            AirtopError::InvalidUrl {
                url: YC_COMPANIES_URL.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}
