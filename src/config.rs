use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Airtop API key（也可以在命令行或请求中提供）
    pub airtop_api_key: Option<String>,
    /// Airtop REST API 地址
    pub airtop_base_url: String,
    /// 会话超时（分钟）
    pub session_timeout_minutes: u32,
    /// 每批同时处理的 URL 数量
    pub batch_size: usize,
    /// 批次之间的等待时间（毫秒）
    pub batch_delay_ms: u64,
    /// 单个 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// HTTP 服务监听地址
    pub server_addr: String,
    /// 结果输出文件（JSON）
    pub results_file: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            airtop_api_key: None,
            airtop_base_url: "https://api.airtop.ai/api/v1".to_string(),
            session_timeout_minutes: 15,
            batch_size: 3,
            batch_delay_ms: 3000,
            request_timeout_secs: 300,
            server_addr: "127.0.0.1:3000".to_string(),
            results_file: "employee_profiles.json".to_string(),
            output_log_file: "run_log.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从默认值 + 环境变量构建配置
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 读取可选的 TOML 配置文件，再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    fn from_toml_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: display.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: display,
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> AppResult<Self> {
        if let Ok(key) = std::env::var("AIRTOP_API_KEY") {
            if !key.trim().is_empty() {
                self.airtop_api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("AIRTOP_BASE_URL") {
            self.airtop_base_url = url;
        }
        if let Some(v) = parse_env("SESSION_TIMEOUT_MINUTES", "u32")? {
            self.session_timeout_minutes = v;
        }
        if let Some(v) = parse_env("BATCH_SIZE", "usize")? {
            self.batch_size = v;
        }
        if let Some(v) = parse_env("BATCH_DELAY_MS", "u64")? {
            self.batch_delay_ms = v;
        }
        if let Some(v) = parse_env("REQUEST_TIMEOUT_SECS", "u64")? {
            self.request_timeout_secs = v;
        }
        if let Ok(addr) = std::env::var("SERVER_ADDR") {
            self.server_addr = addr;
        }
        if let Ok(path) = std::env::var("RESULTS_FILE") {
            self.results_file = path;
        }
        if let Ok(path) = std::env::var("OUTPUT_LOG_FILE") {
            self.output_log_file = path;
        }
        if let Some(v) = parse_env("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => parse_value(var_name, &value, expected_type).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        }
        .into()
    })
}
