//! Document processing pipeline: extraction, chunking, and summarization orchestration.

pub mod chunking;
mod service;
pub mod types;

pub use chunking::{ChunkBatch, chunk_text};
pub use service::{ProcessingApi, ProcessingService};
pub use types::{ChunkingError, ProcessingError, ProcessingOptions, SummaryOutcome};
