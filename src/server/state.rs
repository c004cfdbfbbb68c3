//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::queue::PrintQueue;

/// Queue server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the JSON file backing the queue
    pub queue_file: PathBuf,
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub queue: Arc<PrintQueue>,
}

impl AppState {
    pub fn new(queue: Arc<PrintQueue>) -> Self {
        Self { queue }
    }
}
