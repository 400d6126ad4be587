#![deny(missing_docs)]

//! Core library for the medbrief report summarization server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Report processing metrics helpers.
pub mod metrics;
/// Report pipeline orchestration.
pub mod report;
/// Hosted chat-completion summarization client.
pub mod summarization;
/// Multipart upload handling and on-disk staging.
pub mod upload;
