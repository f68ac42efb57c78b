pub mod employee_flow;
pub mod pipeline_ctx;

pub use employee_flow::{ContinueResponse, EmployeeFlow, ProcessBatchResponse, StartResponse};
pub use pipeline_ctx::{PipelineCtx, PipelineStage};
