//! # Print Agent
//!
//! Runs next to a restaurant's kitchen printer. Two tasks share one
//! [`PrintPipeline`]:
//!
//! - the [`Poller`], draining the restaurant's print queue every
//!   `POLL_INTERVAL_MS`
//! - the HTTP surface on `PORT`: `GET /health`, `POST /print-order`
//!
//! ## Usage
//!
//! ```bash
//! RESTAURANT_ID=kaktus PRINTER_IP=192.168.1.100 kitchen-print agent
//! ```
//!
//! Exactly one agent should run per restaurant: two agents draining the
//! same queue would both print every order.

pub mod client;
pub mod http;
pub mod pipeline;
pub mod poller;
pub mod status;

pub use client::{HttpQueueClient, QueueClient};
pub use pipeline::PrintPipeline;
pub use poller::{CycleReport, Poller};
pub use status::{AgentStatus, HealthReport};

use std::future::IntoFuture;
use std::sync::Arc;

use tracing::info;

use crate::config::AgentConfig;
use crate::error::PrintError;

/// Run the agent until the HTTP server fails or the process is interrupted.
pub async fn run(config: AgentConfig) -> Result<(), PrintError> {
    let settings = &config.printer;
    let fonts = Arc::new(settings.load_fonts()?);
    info!(fonts = ?fonts, width = settings.printer.width_dots, "Receipt renderer ready");

    let pipeline = Arc::new(PrintPipeline::new(
        settings.style.clone(),
        settings.rasterizer(fonts),
        settings.printer,
        Arc::new(settings.transport()),
    ));
    let status = Arc::new(AgentStatus::new(
        config.restaurant_id.clone(),
        pipeline.printer_address(),
    ));
    let client = Arc::new(HttpQueueClient::new(config.main_server_url.clone())?);

    let poller = Poller::new(client, pipeline.clone(), status.clone(), config.restaurant_id.clone())
        .with_interval(config.poll_interval)
        .with_stuck_threshold(config.stuck_threshold);

    let addr = ("0.0.0.0", config.http_port);
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        PrintError::Connection(format!("Failed to bind to port {}: {}", config.http_port, e))
    })?;
    info!(
        port = config.http_port,
        restaurant_id = %config.restaurant_id,
        queue = %config.main_server_url,
        "Print agent listening"
    );

    let app = http::router(pipeline, status);
    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.map_err(|e| PrintError::Connection(format!("Server error: {}", e)))
        }
        _ = poller.run() => Ok(()),
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down print agent");
            Ok(())
        }
    }
}
