//! Timing metrics for batch operations.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// Accumulated timings for one operation.
#[derive(Debug, Clone, Copy)]
pub struct OpStats {
    pub count: u64,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl OpStats {
    fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
    }

    /// Mean duration across recorded runs.
    pub fn avg(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        self.total / self.count as u32
    }
}

/// Registry of per-operation timing statistics.
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    ops: Mutex<HashMap<&'static str, OpStats>>,
}

impl PerformanceMetrics {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one run of an operation.
    pub fn record(&self, op: &'static str, elapsed: Duration) {
        let mut ops = self.ops.lock();
        ops.entry(op)
            .or_insert(OpStats {
                count: 0,
                total: Duration::ZERO,
                min: Duration::MAX,
                max: Duration::ZERO,
            })
            .record(elapsed);
    }

    /// Statistics for one operation, if any runs were recorded.
    pub fn get(&self, op: &str) -> Option<OpStats> {
        self.ops.lock().get(op).copied()
    }

    /// A snapshot of all recorded operations.
    pub fn snapshot(&self) -> HashMap<&'static str, OpStats> {
        self.ops.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_count_min_max() {
        let metrics = PerformanceMetrics::new();
        metrics.record("batch_add", Duration::from_millis(10));
        metrics.record("batch_add", Duration::from_millis(30));

        let stats = metrics.get("batch_add").unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, Duration::from_millis(10));
        assert_eq!(stats.max, Duration::from_millis(30));
        assert_eq!(stats.avg(), Duration::from_millis(20));
    }

    #[test]
    fn unrecorded_operation_is_none() {
        let metrics = PerformanceMetrics::new();
        assert!(metrics.get("batch_convert").is_none());
    }
}
