use metrics::{counter, describe_counter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Throughput counters for one pipeline run.
///
/// Counts are mirrored into the `metrics` facade so an exporter can be
/// installed by the embedding process; the local atomics back the
/// end-of-run snapshot either way.
#[derive(Debug)]
pub struct PipelineMetrics {
    books_processed: AtomicU64,
    quotes_processed: AtomicU64,
    orders_generated: AtomicU64,
    streams_published: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        describe_counter!(
            "pipeline_books_total",
            "Order book snapshots fed into the pipeline"
        );
        describe_counter!("pipeline_quotes_total", "Raw quotes fed into the pipeline");
        describe_counter!(
            "pipeline_execution_orders_total",
            "Execution orders generated by the algo execution engine"
        );
        describe_counter!(
            "pipeline_price_streams_total",
            "Price streams published by the algo streaming engine"
        );

        Self {
            books_processed: AtomicU64::new(0),
            quotes_processed: AtomicU64::new(0),
            orders_generated: AtomicU64::new(0),
            streams_published: AtomicU64::new(0),
        }
    }

    pub fn increment_books_processed(&self) {
        self.books_processed.fetch_add(1, Ordering::Relaxed);
        counter!("pipeline_books_total").increment(1);
    }

    pub fn increment_quotes_processed(&self) {
        self.quotes_processed.fetch_add(1, Ordering::Relaxed);
        counter!("pipeline_quotes_total").increment(1);
    }

    pub fn increment_orders_generated(&self) {
        self.orders_generated.fetch_add(1, Ordering::Relaxed);
        counter!("pipeline_execution_orders_total").increment(1);
    }

    pub fn increment_streams_published(&self) {
        self.streams_published.fetch_add(1, Ordering::Relaxed);
        counter!("pipeline_price_streams_total").increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            books_processed: self.books_processed.load(Ordering::Relaxed),
            quotes_processed: self.quotes_processed.load(Ordering::Relaxed),
            orders_generated: self.orders_generated.load(Ordering::Relaxed),
            streams_published: self.streams_published.load(Ordering::Relaxed),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub books_processed: u64,
    pub quotes_processed: u64,
    pub orders_generated: u64,
    pub streams_published: u64,
}
