pub mod audit;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod guard;
pub mod merge;
pub mod pipeline;
pub mod price;
mod retry;
pub mod source;

pub use audit::{MemoryAuditSink, TracingAuditSink};
pub use error::ScraperError;
pub use fetch::{HtmlFetcher, ScraperSettings};
pub use guard::{is_blocked, UrlGuard};
pub use merge::merge;
pub use pipeline::{extract_product, ProductScraper};
pub use source::detect_source;
