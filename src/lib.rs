//! # Kitchen Print - Cafeteria Kitchen Receipt Printing
//!
//! Hands new orders from the order service to the kitchen printers:
//!
//! - **Print queue**: durable, per-restaurant queue with an HTTP surface
//! - **Receipts**: right-to-left Persian kitchen tickets
//! - **Rendering**: shaping, bidi, fonts and 1-bit rasterization
//! - **Protocol**: ESC/POS raster and cut commands
//! - **Transport**: raw TCP to network printers (port 9100)
//! - **Agent**: the poll loop that prints and drains the queue
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kitchen_print::{
//!     order::{Order, OrderItem},
//!     printer::PrinterConfig,
//!     protocol::build_print_job,
//!     receipt::{ReceiptStyle, render_receipt},
//!     render::{FontSet, Rasterizer},
//!     transport::{NetworkTransport, PrinterTransport},
//! };
//!
//! # async fn example() -> Result<(), kitchen_print::error::PrintError> {
//! let order = Order {
//!     id: "ORD-2025-000777".into(),
//!     kitchen_number: "412".into(),
//!     restaurant_id: "kaktus".into(),
//!     items: vec![OrderItem::new("چلوکباب کوبیده", 2)],
//!     ..Default::default()
//! };
//!
//! let config = PrinterConfig::default();
//! let rasterizer = Rasterizer::new(Arc::new(FontSet::embedded()?), config.width_dots as usize);
//! let raster = rasterizer
//!     .rasterize(render_receipt(&order, &ReceiptStyle::default()))
//!     .await?;
//!
//! let printer = NetworkTransport::new("192.168.1.100", 9100);
//! printer.send(&build_print_job(&raster, &config)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`order`] | Order and queue entry model |
//! | [`queue`] | File-backed print queue store |
//! | [`server`] | Print queue HTTP service |
//! | [`receipt`] | Order to receipt document |
//! | [`document`] | Receipt document model |
//! | [`render`] | Document to 1-bit raster |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Printer delivery |
//! | [`printer`] | Printer configuration |
//! | [`agent`] | Queue poller and agent HTTP surface |
//! | [`config`] | CLI/environment configuration |
//! | [`error`] | Error types |

pub mod agent;
pub mod config;
pub mod document;
pub mod error;
pub mod order;
pub mod printer;
pub mod protocol;
pub mod queue;
pub mod receipt;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::PrintError;
pub use order::{Order, OrderItem, QueueEntry};
pub use printer::PrinterConfig;
pub use transport::NetworkTransport;
