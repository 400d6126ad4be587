//! Report pipeline: staging, extraction, and summarization.

mod service;
pub mod types;

pub use service::{ReportApi, ReportService};
pub use types::{ReportError, ReportOutcome, ReportSettings};
