//! # Printer Module
//!
//! Kitchen printer hardware settings used by the rasterizer and job builder.

pub mod config;

pub use config::{DEFAULT_WIDTH_DOTS, PrinterConfig};
