//! Fixed-size chunking of extracted document text.
//!
//! Chunks are counted in characters (Unicode scalar values), never bytes, so a slice boundary
//! can split a word or a sentence but never a code point. Only the leading `max_chunks` slices
//! are kept; the total before truncation is reported so callers can tell how much was dropped.

use super::types::ChunkingError;

/// Ordered chunks selected for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBatch {
    chunks: Vec<String>,
    total_chunks: usize,
}

impl ChunkBatch {
    /// Chunks kept for summarization, in document order.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Number of chunks the text produced before the cap was applied.
    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    /// Number of trailing chunks dropped by the cap.
    pub fn discarded(&self) -> usize {
        self.total_chunks - self.chunks.len()
    }

    /// Number of chunks kept.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the batch holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Consume the batch and return the kept chunks.
    pub fn into_chunks(self) -> Vec<String> {
        self.chunks
    }
}

/// Slice `text` into consecutive `chunk_size`-character pieces and keep the first `max_chunks`.
///
/// The final piece may be shorter. Empty input yields an empty batch.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    max_chunks: usize,
) -> Result<ChunkBatch, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if max_chunks == 0 {
        return Err(ChunkingError::InvalidChunkLimit);
    }

    let total_chunks = text.chars().count().div_ceil(chunk_size);
    let chunks = text
        .char_indices()
        .step_by(chunk_size)
        .take(max_chunks)
        .map(|(start, _)| {
            let end = text[start..]
                .char_indices()
                .nth(chunk_size)
                .map_or(text.len(), |(offset, _)| start + offset);
            text[start..end].to_string()
        })
        .collect();

    Ok(ChunkBatch {
        chunks,
        total_chunks,
    })
}
