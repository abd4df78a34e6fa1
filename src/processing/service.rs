//! Processing service coordinating extraction, chunking, and summarization.

use crate::{
    extraction::TextExtractor,
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::{
        chunking::chunk_text,
        types::{ProcessingError, ProcessingOptions, SummaryOutcome},
    },
    summarization::{SummarizationClient, SummarizationRequest},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Coordinates the full pipeline: text extraction, fixed-size chunking, and per-chunk summaries.
///
/// The extractor and summarization client are injected so the model is loaded once by the
/// caller and shared read-only across requests. Construct the service once near process start
/// and share it through an `Arc`.
pub struct ProcessingService {
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn SummarizationClient>,
    options: ProcessingOptions,
    metrics: SummaryMetrics,
}

/// Abstraction over the processing pipeline used by the HTTP surface.
#[async_trait]
pub trait ProcessingApi: Send + Sync {
    /// Extract, chunk, and summarize an uploaded PDF.
    async fn summarize_document(
        &self,
        document: Vec<u8>,
    ) -> Result<SummaryOutcome, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ProcessingService {
    /// Build a new processing service from its collaborators.
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn SummarizationClient>,
        options: ProcessingOptions,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            options,
            metrics: SummaryMetrics::new(),
        }
    }

    /// Extract, chunk, and summarize a document.
    ///
    /// Chunks are summarized one at a time in document order; the first failing chunk aborts
    /// the request.
    pub async fn summarize_document(
        &self,
        document: Vec<u8>,
    ) -> Result<SummaryOutcome, ProcessingError> {
        let result = self.run_pipeline(document).await;
        match &result {
            Ok(outcome) => self.metrics.record_document(
                outcome.chunks_summarized as u64,
                (outcome.chunks_total - outcome.chunks_summarized) as u64,
            ),
            Err(ProcessingError::NoReadableText) => self.metrics.record_rejection(),
            Err(error) if error.is_rejection() => {}
            Err(_) => self.metrics.record_failure(),
        }
        result
    }

    async fn run_pipeline(&self, document: Vec<u8>) -> Result<SummaryOutcome, ProcessingError> {
        tracing::info!(bytes = document.len(), "Processing document");

        let extractor = Arc::clone(&self.extractor);
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&document))
            .await
            .map_err(|error| ProcessingError::Task(error.to_string()))??;

        let text = extracted.as_str();
        let characters = text.chars().count();
        tracing::debug!(
            characters,
            pages_with_text = extracted.pages_with_text(),
            "Extracted text"
        );

        let batch = chunk_text(text, self.options.chunk_size, self.options.max_chunks)?;
        if batch.discarded() > 0 {
            tracing::warn!(
                total_chunks = batch.total_chunks(),
                kept = batch.len(),
                discarded = batch.discarded(),
                "Document exceeds chunk cap; trailing text will not be summarized"
            );
        }
        let chunks_total = batch.total_chunks();

        let mut summaries = Vec::with_capacity(batch.len());
        for (index, chunk) in batch.into_chunks().into_iter().enumerate() {
            tracing::debug!(chunk = index, characters = chunk.chars().count(), "Summarizing chunk");
            let summary = self
                .summarizer
                .generate_summary(SummarizationRequest {
                    model: self.options.model.clone(),
                    text: chunk,
                    max_length: self.options.summary_max_length,
                    min_length: self.options.summary_min_length,
                    do_sample: false,
                })
                .await?;
            summaries.push(summary);
        }

        let summary = summaries.join("\n");
        tracing::info!(
            chunks = summaries.len(),
            chunks_total,
            characters,
            summary = %summary,
            "Summary result"
        );

        Ok(SummaryOutcome {
            summary,
            chunks_summarized: summaries.len(),
            chunks_total,
            characters,
        })
    }

    /// Expose current summarization metrics.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl ProcessingApi for ProcessingService {
    async fn summarize_document(
        &self,
        document: Vec<u8>,
    ) -> Result<SummaryOutcome, ProcessingError> {
        ProcessingService::summarize_document(self, document).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ProcessingService::metrics_snapshot(self)
    }
}
