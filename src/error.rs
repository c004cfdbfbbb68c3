//! # Error Types
//!
//! This module defines the error type shared by the rendering, transport and
//! agent layers. Queue storage errors live in [`crate::queue::QueueError`].

use thiserror::Error;

/// Main error type for print operations
#[derive(Debug, Error)]
pub enum PrintError {
    /// Printer refused the connection or the address is wrong
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Printer did not accept the connection in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Rasterization did not finish within the configured wait
    #[error("Rasterization timed out after {0} ms")]
    RasterTimeout(u64),

    /// Rasterization failed for another reason (worker panicked, bad size)
    #[error("Raster error: {0}")]
    Raster(String),

    /// Font file could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Image encoding error (PNG preview)
    #[error("Image error: {0}")]
    Image(String),

    /// The order service answered with an error or was unreachable
    #[error("Queue service error: {0}")]
    QueueService(String),

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PrintError {
    fn from(e: reqwest::Error) -> Self {
        PrintError::QueueService(e.to_string())
    }
}
