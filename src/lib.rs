//! # YC Company Employees
//!
//! 从 YC 批次出发，经由 Airtop 远程浏览器收集公司员工的 LinkedIn 主页
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Airtop 会话），只暴露能力
//! - `AirtopClient` - 会话 / 窗口 / page-query / scrape 的 REST 客户端
//! - `SessionScope` - 记录一个阶段打开的窗口和会话，结束时统一释放
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程顺序
//! - `YcExtractorService` - YC 批次 / 公司 / 公司 LinkedIn 主页
//! - `LinkedInExtractorService` - 登录检测 / 员工列表页 / 员工主页
//! - `process_batched_urls` - 分批并发处理 URL
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次运行"的阶段和会话清理规则
//! - `PipelineCtx` - 上下文封装（session + profile + batch）
//! - `EmployeeFlow` - start / continue / process-batch / terminate
//!
//! ### ④ 接入层（Orchestration / API）
//! - `orchestrator/app` - 命令行交互式运行
//! - `api/` - HTTP JSON 接口
//!
//! ## 模块结构

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{AirtopClient, SessionScope};
pub use models::{Company, SessionSource};
pub use orchestrator::{App, RunOptions};
pub use workflow::{EmployeeFlow, PipelineCtx, ProcessBatchResponse, StartResponse};
