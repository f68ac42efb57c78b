//! LinkedIn 提取服务 - 业务能力层
//!
//! 登录检测、登录页 live view、员工列表页 URL、员工主页 URL。
//! 正则匹配交给 [`UrlExtractor`]，这里只管窗口和抓取。

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::{AirtopClient, SessionScope};
use crate::models::{IsLoggedInResponse, SessionSource};
use crate::services::batch_processor::{process_batched_urls, BatchOptions};
use crate::services::page_query::query_page;
use crate::services::prompts::{IS_LOGGED_IN_PROMPT, LINKEDIN_FEED_URL};
use crate::services::url_extractor::{EmployeeListUrlExtractor, EmployeeProfileUrlExtractor, UrlExtractor};

/// LinkedIn 提取服务
#[derive(Clone)]
pub struct LinkedInExtractorService {
    client: AirtopClient,
    list_extractor: Arc<dyn UrlExtractor>,
    profile_extractor: Arc<dyn UrlExtractor>,
    /// profile 来源时新建会话的超时
    session_timeout_minutes: u32,
}

impl LinkedInExtractorService {
    pub fn new(client: AirtopClient, session_timeout_minutes: u32) -> Self {
        Self {
            client,
            list_extractor: Arc::new(EmployeeListUrlExtractor),
            profile_extractor: Arc::new(EmployeeProfileUrlExtractor),
            session_timeout_minutes,
        }
    }

    /// 替换默认的 URL 提取器
    pub fn with_extractors(
        mut self,
        list_extractor: Arc<dyn UrlExtractor>,
        profile_extractor: Arc<dyn UrlExtractor>,
    ) -> Self {
        self.list_extractor = list_extractor;
        self.profile_extractor = profile_extractor;
        self
    }

    /// 打开 LinkedIn feed 页，判断是否已登录
    pub async fn check_if_signed_in(&self, session_id: &str) -> AppResult<bool> {
        info!("🔐 检查 LinkedIn 登录状态");

        let scope = SessionScope::borrowed(&self.client, session_id);
        let result = async {
            let window = scope.open_window(LINKEDIN_FEED_URL).await?;
            query_page::<IsLoggedInResponse>(
                &self.client,
                scope.session_id(),
                &window.window_id,
                IS_LOGGED_IN_PROMPT,
                "is_logged_in",
            )
            .await
        }
        .await;
        scope.close().await;

        let signed_in = result?.is_logged_in;
        info!("{} LinkedIn 登录状态: {}", if signed_in { "✓" } else { "✗" }, signed_in);
        Ok(signed_in)
    }

    /// 打开登录页窗口并返回其 live view 地址
    ///
    /// 窗口保持打开，供用户手动登录。
    pub async fn get_login_live_view_url(&self, session_id: &str) -> AppResult<String> {
        let window = self.client.create_window(session_id, LINKEDIN_FEED_URL).await?;
        let info = self.client.get_window_info(session_id, &window.window_id).await?;
        info!("🖥️ 登录页 live view: {}", info.live_view_url);
        Ok(info.live_view_url)
    }

    /// 从公司主页抓取员工列表页 URL
    ///
    /// 单个公司失败或没找到只记录日志并跳过；结果去重，保持首次出现顺序。
    pub async fn get_employees_list_urls(
        &self,
        company_urls: &[String],
        source: &SessionSource,
        options: BatchOptions,
    ) -> AppResult<Vec<String>> {
        info!("👥 获取 {} 家公司的员工列表页 ({})", company_urls.len(), source);

        let scope = SessionScope::from_source(&self.client, source, self.session_timeout_minutes).await?;
        let scope_ref = &scope;

        let result = process_batched_urls(company_urls, options, move |company_url| async move {
            match self.scrape_and_extract(scope_ref, &company_url, self.list_extractor.as_ref()).await {
                Ok(urls) => match urls.into_iter().next() {
                    Some(url) => Ok::<_, AppError>(Some(url)),
                    None => {
                        warn!("⚠️ {} 页面上没有找到员工列表链接", company_url);
                        Ok(None)
                    }
                },
                Err(e) => {
                    warn!("⚠️ 抓取 {} 的员工列表链接失败: {}", company_url, e);
                    Ok(None)
                }
            }
        })
        .await;
        scope.close().await;

        let mut seen = HashSet::new();
        let urls: Vec<String> = result?
            .into_iter()
            .flatten()
            .filter(|url| seen.insert(url.clone()))
            .collect();
        info!("✓ 得到 {} 个员工列表页", urls.len());
        Ok(urls)
    }

    /// 从员工列表页抓取员工主页 URL
    ///
    /// 任一页面失败整个操作失败；各页结果按顺序拼接，不跨页去重。
    pub async fn get_employees_profile_urls(
        &self,
        list_urls: &[String],
        source: &SessionSource,
        options: BatchOptions,
    ) -> AppResult<Vec<String>> {
        info!("🧑 从 {} 个员工列表页提取主页链接 ({})", list_urls.len(), source);

        let scope = SessionScope::from_source(&self.client, source, self.session_timeout_minutes).await?;
        let scope_ref = &scope;

        let result = process_batched_urls(list_urls, options, move |list_url| async move {
            let urls = self
                .scrape_and_extract(scope_ref, &list_url, self.profile_extractor.as_ref())
                .await?;
            debug!("{} → {} 个主页", list_url, urls.len());
            Ok::<_, AppError>(urls)
        })
        .await;
        scope.close().await;

        let urls: Vec<String> = result?.into_iter().flatten().collect();
        info!("✓ 得到 {} 个员工主页", urls.len());
        Ok(urls)
    }

    async fn scrape_and_extract(
        &self,
        scope: &SessionScope<'_>,
        url: &str,
        extractor: &dyn UrlExtractor,
    ) -> AppResult<Vec<String>> {
        let window = scope.open_window(url).await?;
        let text = self.client.scrape_content(scope.session_id(), &window.window_id).await;
        scope.close_window(&window.window_id).await;
        Ok(extractor.extract(&text?))
    }
}
