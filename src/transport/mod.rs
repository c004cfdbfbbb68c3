//! # Printer Transport Layer
//!
//! Delivery of finished ESC/POS bytes to a printer.
//!
//! ## Available Transports
//!
//! - [`network`]: raw TCP (port 9100), one connection per job

pub mod network;

pub use network::NetworkTransport;

use async_trait::async_trait;

use crate::error::PrintError;

/// Something that can deliver a complete print job.
#[async_trait]
pub trait PrinterTransport: Send + Sync {
    /// Deliver `data` as one job. Errors are returned to the caller unretried.
    async fn send(&self, data: &[u8]) -> Result<(), PrintError>;

    /// Human-readable printer address for logs and health output.
    fn address(&self) -> String;
}
