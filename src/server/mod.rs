//! # Print Queue HTTP Service
//!
//! The order-service side of the print hand-off: a durable queue of orders
//! waiting to be printed, reachable over three endpoints.
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/api/print-queue?restaurantId=<id>` | 200, JSON array (whole queue without the parameter) |
//! | POST | `/api/print-queue` | 201 queued, 200 already queued, 400 missing `id`/`restaurantId` |
//! | DELETE | `/api/print-queue/:id` | 200 removed, 404 unknown id |
//!
//! ## Usage
//!
//! ```bash
//! kitchen-print queue-server --listen 0.0.0.0:3000 --queue-file data/print-queue.json
//! ```

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::PrintError;
use crate::queue::PrintQueue;

/// Build the print queue router around an existing queue.
pub fn router(queue: Arc<PrintQueue>) -> Router {
    let app_state = Arc::new(AppState::new(queue));

    Router::new()
        .route(
            "/api/print-queue",
            get(handlers::print_queue::list).post(handlers::print_queue::enqueue),
        )
        .route(
            "/api/print-queue/:id",
            delete(handlers::print_queue::remove),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the print queue HTTP server.
///
/// ## Example
///
/// ```no_run
/// use kitchen_print::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), kitchen_print::error::PrintError> {
/// let config = ServerConfig {
///     queue_file: "data/print-queue.json".into(),
///     listen_addr: "0.0.0.0:3000".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PrintError> {
    let queue = PrintQueue::open(&config.queue_file)
        .await
        .map_err(|e| PrintError::Config(e.to_string()))?;
    let app = router(Arc::new(queue));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PrintError::Connection(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    info!(
        listen_addr = %config.listen_addr,
        queue_file = %config.queue_file.display(),
        "Print queue server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| PrintError::Connection(format!("Server error: {}", e)))?;

    Ok(())
}
