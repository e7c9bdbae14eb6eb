//! Risk aggregation over scored executions.

mod aggregator;
mod report;

pub use aggregator::RiskAggregator;
pub use report::{Hotspot, JobRisk, RiskReport, Summary};
