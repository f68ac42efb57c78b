/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing
///
/// 优先使用 `RUST_LOG`，否则 verbose 时为 debug，默认 info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化运行日志文件
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nYC 员工主页提取日志 - {}\n{}\n\n",
        "=".repeat(60),
        now(),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向运行日志文件追加一行（带时间戳）
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(file, "[{}] {}", now(), line)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `batch_size`: 每批并发数
/// - `batch_delay_ms`: 批间等待
pub fn log_startup(batch_size: usize, batch_delay_ms: u64) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - YC 批次员工主页提取");
    info!("📊 每批并发数: {}，批间等待: {} ms", batch_size, batch_delay_ms);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始 URL 编号
/// - `end`: 结束 URL 编号
/// - `total`: URL 总数
pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批 URL: {}-{} / 共 {} 个", start, end, total);
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, processed: usize, total_batches: usize) {
    info!("✓ 第 {}/{} 批完成: 处理 {} 个 URL", batch_num, total_batches, processed);
    info!("{}", "─".repeat(60));
}

/// 单次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub batch: String,
    pub companies: usize,
    pub company_linkedin_urls: usize,
    pub employee_profile_urls: usize,
}

impl RunStats {
    pub fn summary(&self) -> String {
        format!(
            "批次 {}: 公司 {} 家，LinkedIn 主页 {} 个，员工主页 {} 个",
            self.batch, self.companies, self.company_linkedin_urls, self.employee_profile_urls
        )
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 运行统计
/// - `results_file`: 结果文件路径
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(stats: &RunStats, results_file: &str, log_file_path: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("完成时间: {}", now());
    info!("{}", "=".repeat(60));
    info!("🏢 公司: {}", stats.companies);
    info!("🔗 公司 LinkedIn 主页: {}", stats.company_linkedin_urls);
    info!("🧑 员工主页: {}", stats.employee_profile_urls);
    info!("{}", "=".repeat(60));
    info!("结果已保存至: {}", results_file);
    info!("日志已保存至: {}", log_file_path);
}

/// 模型原始返回写进日志时的最大字符数
pub const MODEL_RESPONSE_LOG_CHARS: usize = 300;

/// 按字符截断，超出部分以 `...` 结尾（页面抓取结果可能很长）
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
