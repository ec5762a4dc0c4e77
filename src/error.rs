//! # Error Types
//!
//! This module defines error types used throughout the placa library.

use thiserror::Error;

/// Main error type for placa operations
#[derive(Debug, Error)]
pub enum PlacaError {
    /// Rejected submission input (reference id, contact, templates)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Font loading or glyph lookup error
    #[error("Font error: {0}")]
    Font(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// PDF document assembly error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Object storage write error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Webhook delivery: the upstream answered with a non-success status
    #[error("Webhook rejected: HTTP {status}: {body}")]
    WebhookRejected { status: u16, body: String },

    /// Webhook delivery: the upstream could not be reached
    #[error("Webhook unreachable: {0}")]
    WebhookUnreachable(String),

    /// Server-level errors (bind, accept loop)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
