//! Error types for the Kanto library.
//!
//! This module provides comprehensive error handling for all Kanto operations.
//! All errors are represented by the [`KantoError`] enum, which provides
//! detailed information about what went wrong.
//!
//! # Examples
//!
//! ```
//! use kanto::error::{KantoError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(KantoError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Kanto operations.
///
/// This enum represents all possible errors that can occur in the Kanto library.
/// It uses the `thiserror` crate for automatic `Error` trait implementation and
/// provides convenient constructor methods for creating specific error types.
#[derive(Error, Debug)]
pub enum KantoError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Catalog-related errors (CSV parsing, ID contiguity, etc.)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Embedding-related errors (dimension mismatch, malformed source, etc.)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The embedding store failed to load or did not become ready in time.
    #[error("Embeddings unavailable: {0}")]
    EmbeddingsUnavailable(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with KantoError.
pub type Result<T> = std::result::Result<T, KantoError>;

impl KantoError {
    /// Create a new catalog error.
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        KantoError::Catalog(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        KantoError::Embedding(msg.into())
    }

    /// Create a new embeddings-unavailable error.
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        KantoError::EmbeddingsUnavailable(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        KantoError::Other(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        KantoError::EmbeddingsUnavailable(format!("Timeout: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        KantoError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        KantoError::Other(format!("Not found: {}", msg.into()))
    }
}
