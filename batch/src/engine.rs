//! Parallel batch conversion engine.

use std::sync::Arc;
use std::time::Instant;

use centime_core::{ArithmeticOp, Currency, Money, MoneyError};
use centime_fx::{Converter, FxResult};
use rayon::prelude::*;
use tracing::info;

use crate::error::BatchError;
use crate::metrics::PerformanceMetrics;

/// Worker-pool sizing, consumed at construction time.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Number of items per work unit.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            chunk_size: 256,
        }
    }
}

/// Fan-outs conversions and aggregations over a bounded worker pool.
///
/// Inputs are partitioned into fixed-size chunks; each worker owns a
/// disjoint index range, so output order always matches input order and
/// parallel results are identical to sequential execution against the
/// same rate snapshot. Batches run to completion; the first per-item
/// error in input order is propagated, never silently skipped.
pub struct BatchEngine {
    converter: Arc<Converter>,
    pool: rayon::ThreadPool,
    chunk_size: usize,
    metrics: PerformanceMetrics,
}

impl BatchEngine {
    /// Build an engine with its own fixed-size worker pool.
    pub fn new(converter: Arc<Converter>, config: BatchConfig) -> Result<Self, BatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .build()?;
        Ok(Self {
            converter,
            pool,
            chunk_size: config.chunk_size.max(1),
            metrics: PerformanceMetrics::new(),
        })
    }

    /// The converter used for per-item conversions.
    pub fn converter(&self) -> &Arc<Converter> {
        &self.converter
    }

    /// Timing statistics for completed batch operations.
    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Convert every value to the target currency, preserving input order.
    pub fn batch_convert(
        &self,
        items: &[Money],
        target: Currency,
    ) -> Result<Vec<Money>, BatchError> {
        if items.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        let start = Instant::now();

        let per_chunk: Vec<Vec<FxResult<Money>>> = self.pool.install(|| {
            items
                .par_chunks(self.chunk_size)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|money| self.converter.convert(*money, target, None))
                        .collect()
                })
                .collect()
        });

        // Chunks come back in input order, so the first error seen here is
        // the first error in input order.
        let mut converted = Vec::with_capacity(items.len());
        for result in per_chunk.into_iter().flatten() {
            converted.push(result?);
        }

        let elapsed = start.elapsed();
        self.metrics.record("batch_convert", elapsed);
        info!(
            items = items.len(),
            currency = %target,
            elapsed_us = elapsed.as_micros() as u64,
            "Batch conversion completed"
        );
        Ok(converted)
    }

    /// Convert every value to the target currency and sum them.
    ///
    /// Workers accumulate partial sums per chunk; the partials are then
    /// merged sequentially. An overflow during the merge is reported
    /// against the merge step, distinct from any per-worker addition.
    pub fn batch_add(&self, items: &[Money], target: Currency) -> Result<Money, BatchError> {
        if items.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        let start = Instant::now();

        let partials: Vec<FxResult<Option<Money>>> = self.pool.install(|| {
            items
                .par_chunks(self.chunk_size)
                .map(|chunk| {
                    let mut acc: Option<Money> = None;
                    for money in chunk {
                        let converted = self.converter.convert(*money, target, None)?;
                        acc = Some(match acc {
                            Some(sum) => sum.checked_add(converted)?,
                            None => converted,
                        });
                    }
                    Ok(acc)
                })
                .collect()
        });

        let mut total: Option<Money> = None;
        for partial in partials {
            let Some(partial) = partial? else { continue };
            total = Some(match total {
                Some(sum) => sum.checked_add(partial).map_err(attribute_to_merge)?,
                None => partial,
            });
        }
        // Non-empty input always yields at least one partial.
        let total = total.ok_or(BatchError::EmptyBatch)?;

        let elapsed = start.elapsed();
        self.metrics.record("batch_add", elapsed);
        info!(
            items = items.len(),
            currency = %target,
            total = %total,
            elapsed_us = elapsed.as_micros() as u64,
            "Batch addition completed"
        );
        Ok(total)
    }
}

fn attribute_to_merge(err: MoneyError) -> BatchError {
    match err {
        MoneyError::Overflow { detail, .. } => {
            MoneyError::overflow(ArithmeticOp::Merge, detail).into()
        }
        other => other.into(),
    }
}
