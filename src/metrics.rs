use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_summarized: AtomicU64,
    chunks_summarized: AtomicU64,
    chunks_discarded: AtomicU64,
    documents_rejected: AtomicU64,
    failures: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document, the chunks sent to the model, and the chunks dropped by the cap.
    pub fn record_document(&self, chunks_summarized: u64, chunks_discarded: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunks_summarized, Ordering::Relaxed);
        self.chunks_discarded
            .fetch_add(chunks_discarded, Ordering::Relaxed);
    }

    /// Record a document rejected for having no readable text.
    pub fn record_rejection(&self) {
        self.documents_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that failed while parsing or summarizing.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            chunks_discarded: self.chunks_discarded.load(Ordering::Relaxed),
            documents_rejected: self.documents_rejected.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents summarized successfully since startup.
    pub documents_summarized: u64,
    /// Chunks sent to the summarization model.
    pub chunks_summarized: u64,
    /// Chunks dropped because a document exceeded the chunk cap.
    pub chunks_discarded: u64,
    /// Documents rejected for containing no readable text.
    pub documents_rejected: u64,
    /// Requests that failed during parsing or summarization.
    pub failures: u64,
}
