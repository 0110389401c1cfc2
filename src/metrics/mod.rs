pub mod drawdown;
pub mod report;
pub mod risk;

pub use drawdown::{DrawdownCurves, DrawdownEpisode};
pub use report::PerformanceReport;
