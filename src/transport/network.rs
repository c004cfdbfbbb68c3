//! # Raw TCP Transport
//!
//! Network receipt printers accept raw ESC/POS bytes on TCP port 9100
//! ("JetDirect" / raw printing). One print job is one connection:
//!
//! 1. Connect (bounded by the connect timeout)
//! 2. Write every byte
//! 3. Flush and shut down the write half
//! 4. Drop the socket
//!
//! There is no acknowledgement from the printer; a successful write means
//! the bytes reached the printer's socket buffer. Partial-print conditions
//! (paper out, cover open) are not detected. Nothing is retried here.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use super::PrinterTransport;
use crate::error::PrintError;

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Default connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// # Network Printer Transport
///
/// ## Example
///
/// ```no_run
/// use kitchen_print::transport::{NetworkTransport, PrinterTransport};
/// use kitchen_print::protocol::commands;
///
/// # async fn example() -> Result<(), kitchen_print::error::PrintError> {
/// let printer = NetworkTransport::new("192.168.1.100", 9100);
/// printer.send(&commands::init()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl NetworkTransport {
    /// Create a transport for `host:port`. The host may be an IP or a name;
    /// it is resolved on every connect.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    /// Set the connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    async fn connect(&self) -> Result<TcpStream, PrintError> {
        let addr = self.address();
        tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", addr)))?
        .map_err(|e| PrintError::Connection(format!("{}: {}", addr, e)))
    }
}

#[async_trait]
impl PrinterTransport for NetworkTransport {
    #[instrument(skip(self, data), fields(addr = %self.address(), data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> Result<(), PrintError> {
        let mut stream = self.connect().await?;
        debug!("Connected to printer");

        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;
        stream.flush().await?;
        stream.shutdown().await?;

        debug!("Print data sent");
        Ok(())
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
