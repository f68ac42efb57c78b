//! 分批 URL 处理器
//!
//! 固定大小分批：批内并发（结果保持输入顺序），批间串行并等待固定时间，
//! 用来避免对远端造成过大压力。任何一个 URL 失败都会让整个调用失败，
//! 需要容错的调用方在 processor 内部捕获错误并返回 `None`。

use std::future::Future;
use std::time::Duration;

use futures::future::try_join_all;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::AppResult;
use crate::utils::logging::{log_batch_complete, log_batch_start};

/// 分批参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 3,
            delay: Duration::from_millis(3000),
        }
    }
}

impl BatchOptions {
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self { batch_size, delay }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.batch_size, config.batch_delay())
    }

    /// 用请求里的并行度覆盖批大小
    pub fn with_parallelism(mut self, parallelism: Option<usize>) -> Self {
        if let Some(p) = parallelism {
            self.batch_size = p;
        }
        self
    }
}

/// 分批处理 URL 列表
///
/// 批间等待次数为 `ceil(N / B) - 1`，最后一批之后不再等待。
pub async fn process_batched_urls<T, F, Fut>(
    urls: &[String],
    options: BatchOptions,
    processor: F,
) -> AppResult<Vec<T>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let batch_size = options.batch_size.max(1);
    let total = urls.len();
    let total_batches = total.div_ceil(batch_size);
    let mut results = Vec::with_capacity(total);

    for (batch_index, chunk) in urls.chunks(batch_size).enumerate() {
        if batch_index > 0 {
            sleep(options.delay).await;
        }

        let batch_num = batch_index + 1;
        let start = batch_index * batch_size;
        log_batch_start(batch_num, total_batches, start + 1, start + chunk.len(), total);

        let batch_results = try_join_all(chunk.iter().cloned().map(&processor)).await?;
        results.extend(batch_results);

        log_batch_complete(batch_num, chunk.len(), total_batches);
    }

    Ok(results)
}
