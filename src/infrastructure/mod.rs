//! 基础设施层
//!
//! - `AirtopClient` - 唯一的远程浏览器资源持有者
//! - `SessionScope` - 阶段内窗口 / 会话的获取与统一释放

pub mod airtop_client;
pub mod session_scope;

pub use airtop_client::AirtopClient;
pub use session_scope::SessionScope;
