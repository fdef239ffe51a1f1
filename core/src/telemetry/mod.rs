pub mod metrics;

pub use metrics::{SweepCounters, SweepMetrics};
