//! 交互式运行器 - 编排层
//!
//! ## 职责
//!
//! 命令行 `run` 子命令的入口，负责一次完整运行的资源和交互。
//!
//! ## 核心功能
//!
//! 1. **初始化**：日志文件、API key / profile 询问
//! 2. **选择批次**：列出 YC 批次，由用户选择（或命令行指定）
//! 3. **登录等待**：未登录时打印 live view 地址，等用户登录后回车
//! 4. **持久化 profile**：终止 YC 会话让登录态写入 profile，再用 profile 新建会话跑 LinkedIn 阶段
//! 5. **输出**：结果写入 JSON 文件，统计写入运行日志

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ExtractionError;
use crate::models::{Session, SessionSource};
use crate::utils::logging::{append_log_line, init_log_file, log_startup, print_final_stats, RunStats};
use crate::utils::Prompter;
use crate::workflow::employee_flow::to_pretty_json;
use crate::workflow::{EmployeeFlow, PipelineCtx, PipelineStage};

/// 命令行参数中与运行相关的部分
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub api_key: Option<String>,
    pub profile_id: Option<String>,
    pub batch: Option<String>,
    pub parallelism: Option<usize>,
}

/// 应用主结构
pub struct App {
    config: Config,
    options: RunOptions,
}

impl App {
    pub fn new(config: Config, options: RunOptions) -> Self {
        Self { config, options }
    }

    /// 从终端交互运行
    pub async fn run(&self) -> Result<RunStats> {
        let mut prompter = Prompter::stdio();
        self.run_with(&mut prompter).await
    }

    /// 运行应用主逻辑
    pub async fn run_with<R, W>(&self, prompter: &mut Prompter<R, W>) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        init_log_file(&self.config.output_log_file)?;
        log_startup(
            self.options.parallelism.unwrap_or(self.config.batch_size),
            self.config.batch_delay_ms,
        );

        let api_key = match self.options.api_key.clone().or_else(|| self.config.airtop_api_key.clone()) {
            Some(key) => key,
            None => prompter.ask("请输入 Airtop API key:").await?,
        };
        let profile_id = match self.options.profile_id.clone() {
            Some(id) => Some(id),
            None => prompter.ask_optional("请输入 profile ID（可选，回车跳过）:").await?,
        };

        let flow = EmployeeFlow::for_api_key(&api_key, &self.config)?;
        let session = flow.create_session(profile_id.as_deref()).await?;

        let result = self.run_session(&flow, &session, prompter).await;
        if let Err(e) = &result {
            warn!("❌ 运行失败，清理会话: {:#}", e);
            flow.terminate_quietly(&session.id).await;
        }
        let stats = result?;

        append_log_line(&self.config.output_log_file, &stats.summary())?;
        print_final_stats(&stats, &self.config.results_file, &self.config.output_log_file);
        Ok(stats)
    }

    async fn run_session<R, W>(
        &self,
        flow: &EmployeeFlow,
        session: &Session,
        prompter: &mut Prompter<R, W>,
    ) -> Result<RunStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let options = flow.batch_options().with_parallelism(self.options.parallelism);
        let mut ctx = PipelineCtx::new(&session.id).with_profile(session.profile_id.clone());

        info!("{} ▶ {}", ctx, PipelineStage::FetchBatches);
        let batches = flow.yc().get_yc_batches(&session.id).await?;

        info!("{} ▶ {}", ctx, PipelineStage::SelectBatch);
        let batch = match self.options.batch.clone() {
            Some(batch) => batch,
            None => prompter.select("请选择 YC 批次:", &batches).await?,
        };
        ctx = ctx.with_batch(&batch);
        append_log_line(&self.config.output_log_file, &format!("选择批次 {}", batch))?;

        let (companies, company_urls) = flow.fetch_company_linkedin_urls(&ctx, &batch, options).await?;

        loop {
            info!("{} ▶ {}", ctx, PipelineStage::CheckLogin);
            if flow.linkedin().check_if_signed_in(&session.id).await? {
                break;
            }
            info!("{} ▶ {}", ctx, PipelineStage::NeedSignIn);
            let live_view_url = flow.linkedin().get_login_live_view_url(&session.id).await?;
            prompter
                .wait_for_enter(&format!(
                    "请在浏览器中打开以下地址登录 LinkedIn，完成后按回车继续:\n{}",
                    live_view_url
                ))
                .await?;
        }

        // 终止会话后登录态才会写入 profile
        let profile_id = session
            .profile_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ExtractionError::MissingProfileId)?;
        info!("{} ▶ {}（持久化 profile）", ctx, PipelineStage::Terminate);
        flow.terminate(&session.id).await?;

        let source = SessionSource::Profile(profile_id);
        let profile_urls = flow
            .fetch_employee_profiles(&ctx, &company_urls, &source, options)
            .await?;

        tokio::fs::write(&self.config.results_file, to_pretty_json(&profile_urls)?)
            .await
            .with_context(|| format!("写入结果文件失败: {}", self.config.results_file))?;

        Ok(RunStats {
            batch,
            companies: companies.len(),
            company_linkedin_urls: company_urls.len(),
            employee_profile_urls: profile_urls.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prompts::{LINKEDIN_FEED_URL, YC_COMPANIES_URL};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_window(server: &MockServer, session: &str, url: &str, window_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/windows", session)))
            .and(body_partial_json(json!({ "url": url })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"windowId": window_id}})))
            .mount(server)
            .await;
    }

    async fn mount_query(server: &MockServer, session: &str, window_id: &str, response: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/windows/{}/page-query", session, window_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"modelResponse": response.to_string()}
            })))
            .mount(server)
            .await;
    }

    async fn mount_scrape(server: &MockServer, session: &str, window_id: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/sessions/{}/windows/{}/scrape-content", session, window_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"modelResponse": {"scrapedContent": {"text": text}}}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_full_run_persists_profile_and_writes_results() {
        let server = MockServer::start().await;
        let company_link = "https://www.ycombinator.com/companies/acme";
        let company_linkedin = "https://www.linkedin.com/company/acme";
        let list_url = "https://www.linkedin.com/search/results/people/?currentCompany=%5B%2242%22%5D";

        // 第一个会话：YC 阶段 + 登录检查
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(body_partial_json(json!({"configuration": {"persistProfile": true}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "s-1", "profileId": "p-1"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sessions/s-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "s-1"}})))
            .mount(&server)
            .await;
        mount_window(&server, "s-1", YC_COMPANIES_URL, "w-yc").await;
        mount_window(&server, "s-1", "https://www.ycombinator.com/companies?batch=S24", "w-batch").await;
        mount_window(&server, "s-1", company_link, "w-co").await;
        mount_window(&server, "s-1", LINKEDIN_FEED_URL, "w-feed").await;
        mount_query(&server, "s-1", "w-yc", json!({"batches": ["W24", "S24"]})).await;
        mount_query(
            &server,
            "s-1",
            "w-batch",
            json!({"companies": [{"name": "Acme", "link": company_link}]}),
        )
        .await;
        mount_query(&server, "s-1", "w-co", json!({"linkedInProfileUrl": company_linkedin})).await;
        mount_query(&server, "s-1", "w-feed", json!({"isLoggedIn": true})).await;
        Mock::given(method("DELETE"))
            .and(path("/sessions/s-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        // 第二个会话：基于 profile 的 LinkedIn 阶段
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(body_partial_json(json!({"configuration": {"baseProfileId": "p-1"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "s-2"}})))
            .with_priority(1)
            .mount(&server)
            .await;
        mount_window(&server, "s-2", company_linkedin, "w-company").await;
        mount_window(&server, "s-2", list_url, "w-list").await;
        mount_scrape(&server, "s-2", "w-company", &format!(r#"href="{}""#, list_url)).await;
        mount_scrape(
            &server,
            "s-2",
            "w-list",
            r#""navigationUrl":"https://www.linkedin.com/in/jane-doe?trk=x""#,
        )
        .await;
        Mock::given(method("DELETE"))
            .and(path("/sessions/s-2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/sessions/s-1/windows/.+$"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = std::env::temp_dir().join(format!("yc_app_run_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = Config {
            airtop_base_url: server.uri(),
            batch_delay_ms: 10,
            results_file: dir.join("profiles.json").to_string_lossy().to_string(),
            output_log_file: dir.join("run_log.txt").to_string_lossy().to_string(),
            ..Config::default()
        };
        let app = App::new(
            config.clone(),
            RunOptions {
                api_key: Some("test-api-key".into()),
                ..RunOptions::default()
            },
        );

        // profile 跳过，选择第 2 个批次
        let mut prompter = Prompter::new(&b"\n2\n"[..], Vec::new());
        let stats = app.run_with(&mut prompter).await.unwrap();

        assert_eq!(stats.batch, "S24");
        assert_eq!(stats.companies, 1);
        assert_eq!(stats.company_linkedin_urls, 1);
        assert_eq!(stats.employee_profile_urls, 1);

        let saved: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&config.results_file).unwrap()).unwrap();
        assert_eq!(saved, vec!["https://www.linkedin.com/in/jane-doe".to_string()]);
        let log = std::fs::read_to_string(&config.output_log_file).unwrap();
        assert!(log.contains("员工主页 1 个"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
