use anyhow::Result;
use clap::Parser;
use tracing::error;

use yc_company_employees::cli::{Cli, Commands};
use yc_company_employees::orchestrator::App;
use yc_company_employees::utils::logging;
use yc_company_employees::{api, Config};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("❌ 程序异常退出: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 加载配置
    let config = Config::load(cli.config.as_deref());

    // 初始化日志（配置加载失败时也要能输出错误）
    let verbose = cli.verbose || config.as_ref().map(|c| c.verbose_logging).unwrap_or(false);
    logging::init(verbose);
    let config = config?;

    match &cli.command {
        Commands::Serve { addr } => {
            let addr = addr.clone().unwrap_or_else(|| config.server_addr.clone());
            api::serve(config, &addr).await
        }
        Commands::Run { .. } => {
            let options = cli.command.run_options().unwrap_or_default();
            App::new(config, options).run().await.map(|_| ())
        }
    }
}
