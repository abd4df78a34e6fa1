#![deny(missing_docs)]

//! Core library for the Rusty Digest PDF summarization server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Document processing pipeline utilities.
pub mod processing;
/// Summarization model clients.
pub mod summarization;
