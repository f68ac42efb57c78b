//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::orchestrator::RunOptions;

/// YC 批次 → LinkedIn 员工主页提取
#[derive(Debug, Parser)]
#[command(name = "yc-company-employees")]
#[command(about = "Extract LinkedIn employee profile URLs for the companies of a YC batch")]
#[command(version)]
pub struct Cli {
    /// TOML 配置文件（可选，环境变量优先）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 交互式运行一次完整提取
    Run {
        /// Airtop API key
        #[arg(long, env = "AIRTOP_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// 已登录 LinkedIn 的浏览器 profile
        #[arg(long)]
        profile_id: Option<String>,

        /// 要处理的 YC 批次（如 S24），不指定时交互选择
        #[arg(long)]
        batch: Option<String>,

        /// 每批并发数
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        parallelism: Option<u64>,
    },

    /// 启动 HTTP API
    Serve {
        /// 监听地址，默认取配置中的 server_addr
        #[arg(long)]
        addr: Option<String>,
    },
}

impl Commands {
    pub fn run_options(&self) -> Option<RunOptions> {
        match self {
            Commands::Run {
                api_key,
                profile_id,
                batch,
                parallelism,
            } => Some(RunOptions {
                api_key: api_key.clone().filter(|k| !k.trim().is_empty()),
                profile_id: profile_id.clone(),
                batch: batch.clone(),
                parallelism: parallelism.map(|p| p as usize),
            }),
            Commands::Serve { .. } => None,
        }
    }
}
