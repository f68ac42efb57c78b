pub mod airtop;
pub mod responses;

pub use airtop::{Session, SessionConfig, SessionSource, WindowHandle, WindowInfo};
pub use responses::{
    Company, CompaniesInBatchResponse, CompanyLinkedInUrlResponse, IsLoggedInResponse,
    ModelResponse, YcBatchesResponse,
};
