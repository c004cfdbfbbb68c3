//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for network thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, justification, feed, cut)
//! - [`graphics`]: Raster bit image commands
//! - [`job`]: A whole receipt job (init → image → cut)
//!
//! ## Usage Example
//!
//! ```
//! use kitchen_print::protocol::{commands, graphics};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(commands::justify(commands::Justification::Center));
//!
//! // 570 dots wide (72 bytes), 24 rows of vertical stripes
//! let image = vec![0xAA; 72 * 24];
//! data.extend(graphics::raster(570, 24, &image));
//!
//! data.extend(commands::cut_full_feed(0));
//! // Send `data` to printer via transport...
//! ```

pub mod commands;
pub mod graphics;
pub mod job;

pub use job::build_print_job;
