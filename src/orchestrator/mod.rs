//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 命令行一次完整运行的"指挥中心"：持有配置、负责交互、输出文件和统计。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行：询问 → 批次 → 登录等待 → 输出)
//!     ↓
//! workflow::EmployeeFlow (阶段编排与会话清理)
//!     ↓
//! services (能力层：YC / LinkedIn / 分批 / URL 提取)
//!     ↓
//! infrastructure (基础设施：AirtopClient / SessionScope)
//! ```
//!
//! HTTP 接口（`api`）与本层平级，同样只调用 workflow。

pub mod app;

pub use app::{App, RunOptions};
