//! Structured logging setup.

mod format;

pub use format::{ReportCounts, StageSummary, StructuredLogger};
