//! # Print Queue Store
//!
//! Durable, per-restaurant list of orders waiting to be printed.
//!
//! The queue is a single JSON array on disk. Every mutation rewrites the
//! file through a temporary sibling and a rename, so a crash leaves either
//! the old or the new contents, never a torn file. All mutations run under
//! one async mutex, which makes enqueue's duplicate check and append atomic
//! within this process.
//!
//! ```no_run
//! use kitchen_print::order::Order;
//! use kitchen_print::queue::{EnqueueOutcome, PrintQueue};
//!
//! # async fn example() -> Result<(), kitchen_print::queue::QueueError> {
//! let queue = PrintQueue::open("data/print-queue.json").await?;
//! let order = Order {
//!     id: "ORD-2025-000777".into(),
//!     restaurant_id: "kaktus".into(),
//!     ..Default::default()
//! };
//! assert_eq!(queue.enqueue(order).await?, EnqueueOutcome::Queued);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::order::{Order, QueueEntry};

/// Errors raised by the queue store.
#[derive(Debug, Error)]
pub enum QueueError {
    /// No entry with this id is queued
    #[error("Order {0} is not in the print queue")]
    NotFound(String),

    /// The order cannot be queued (missing id or restaurant)
    #[error("Invalid order: {0}")]
    Invalid(String),

    /// Reading or writing the queue file failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        let status = match self {
            QueueError::NotFound(_) => StatusCode::NOT_FOUND,
            QueueError::Invalid(_) => StatusCode::BAD_REQUEST,
            QueueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Result of an enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The order was appended
    Queued,
    /// An entry with the same id was already present; nothing changed
    AlreadyQueued,
}

/// The print queue.
pub struct PrintQueue {
    /// Backing file. `None` keeps the queue in memory only.
    path: Option<PathBuf>,
    entries: Mutex<Vec<QueueEntry>>,
}

impl PrintQueue {
    /// Open (or create) a file-backed queue.
    ///
    /// A missing file is an empty queue. An empty file is also accepted.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, QueueError> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                QueueError::Storage(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(QueueError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        info!(path = %path.display(), entries = entries.len(), "Print queue loaded");

        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    /// A queue that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append an order unless its id is already queued.
    pub async fn enqueue(&self, order: Order) -> Result<EnqueueOutcome, QueueError> {
        if order.id.trim().is_empty() {
            return Err(QueueError::Invalid("order id is required".to_string()));
        }
        if order.restaurant_id.trim().is_empty() {
            return Err(QueueError::Invalid("restaurantId is required".to_string()));
        }

        let mut entries = self.entries.lock().await;
        if entries.iter().any(|e| e.order.id == order.id) {
            debug!(order_id = %order.id, "Order already queued");
            return Ok(EnqueueOutcome::AlreadyQueued);
        }

        let mut updated = entries.clone();
        updated.push(QueueEntry::new(order));
        self.persist(&updated).await?;
        *entries = updated;

        Ok(EnqueueOutcome::Queued)
    }

    /// List entries, optionally only those of one restaurant, in insertion order.
    pub async fn list(&self, restaurant_id: Option<&str>) -> Vec<QueueEntry> {
        let entries = self.entries.lock().await;
        match restaurant_id {
            Some(id) => entries
                .iter()
                .filter(|e| e.order.restaurant_id == id)
                .cloned()
                .collect(),
            None => entries.clone(),
        }
    }

    /// Remove the entry with this id. Removing an unknown id is an error.
    pub async fn remove(&self, id: &str) -> Result<QueueEntry, QueueError> {
        let mut entries = self.entries.lock().await;
        let pos = entries
            .iter()
            .position(|e| e.order.id == id)
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;

        let mut updated = entries.clone();
        let removed = updated.remove(pos);
        self.persist(&updated).await?;
        *entries = updated;

        Ok(removed)
    }

    /// Number of queued entries across all restaurants.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Write the queue to disk: temp file, then rename over the old one.
    async fn persist(&self, entries: &[QueueEntry]) -> Result<(), QueueError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| QueueError::Storage(format!("Failed to encode queue: {}", e)))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                QueueError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| QueueError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            QueueError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}
