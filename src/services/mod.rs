pub mod batch_processor;
pub mod linkedin_extractor;
pub mod page_query;
pub mod prompts;
pub mod url_extractor;
pub mod yc_extractor;

pub use batch_processor::{process_batched_urls, BatchOptions};
pub use linkedin_extractor::LinkedInExtractorService;
pub use url_extractor::{EmployeeListUrlExtractor, EmployeeProfileUrlExtractor, UrlExtractor};
pub use yc_extractor::YcExtractorService;
