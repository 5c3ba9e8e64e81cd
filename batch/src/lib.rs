//! Centime Batch Engine
//!
//! Parallel conversion and aggregation over collections of monetary
//! values. Work is partitioned into fixed-size chunks across a bounded
//! worker pool; workers process disjoint index ranges, so results are
//! always returned in input order and are identical to sequential
//! execution for the same inputs and rate snapshot.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod metrics;

pub use engine::{BatchConfig, BatchEngine};
pub use error::BatchError;
pub use metrics::{OpStats, PerformanceMetrics};
