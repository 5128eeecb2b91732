//! 데이터 수집 모듈.

pub mod checkpoint;
pub mod collector;
pub mod export;
pub mod period_runner;

pub use checkpoint::CheckpointStore;
pub use collector::ChartCollector;
pub use export::{export_csv, export_path};
pub use period_runner::{PeriodRunner, RunOutcome};
