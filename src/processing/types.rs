//! Core data types and error definitions for the processing pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::SummarizationClientError;
use thiserror::Error;

/// Errors produced while slicing text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// A chunk must hold at least one character.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
    /// At least one chunk must be kept for summarization.
    #[error("chunk limit must be greater than zero")]
    InvalidChunkLimit,
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The upload did not carry a usable document.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
    /// Extraction succeeded but produced no readable text.
    #[error("No readable text in PDF")]
    NoReadableText,
    /// The document could not be parsed.
    #[error(transparent)]
    Extraction(ExtractionError),
    /// Chunking parameters were rejected.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// The summarization model failed for one of the chunks.
    #[error(transparent)]
    Summarization(#[from] SummarizationClientError),
    /// A blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl From<ExtractionError> for ProcessingError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::NoReadableText => Self::NoReadableText,
            other => Self::Extraction(other),
        }
    }
}

impl ProcessingError {
    /// Whether the error is an expected rejection of the caller's input rather than a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidUpload(_) | Self::NoReadableText)
    }
}

/// Tunables applied to every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Characters per chunk.
    pub chunk_size: usize,
    /// Leading chunks kept for summarization.
    pub max_chunks: usize,
    /// Model identifier passed to the summarization client.
    pub model: String,
    /// Upper bound on each chunk summary.
    pub summary_max_length: usize,
    /// Lower bound on each chunk summary.
    pub summary_min_length: usize,
}

impl From<&crate::config::Config> for ProcessingOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            max_chunks: config.max_chunks,
            model: config.summarization_model.clone(),
            summary_max_length: config.summary_max_length,
            summary_min_length: config.summary_min_length,
        }
    }
}

/// Result of a completed summarization produced by [`crate::processing::ProcessingService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Per-chunk summaries joined with line breaks, in document order.
    pub summary: String,
    /// Chunks sent to the model.
    pub chunks_summarized: usize,
    /// Chunks the text produced before the cap was applied.
    pub chunks_total: usize,
    /// Character length of the extracted text.
    pub characters: usize,
}
