//! Training history access for the progression engine.

pub mod import;
pub mod provider;

pub use import::TrainingLog;
pub use provider::{HistoryError, InMemoryHistory, PerformanceHistory};
