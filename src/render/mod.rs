//! # Rendering Module
//!
//! Converts a receipt [`Document`] into a 1-bit raster the printer head can
//! burn directly.
//!
//! ## Modules
//!
//! - [`shaping`]: Persian/Arabic contextual forms
//! - [`bidi`]: per-line visual reordering
//! - [`font`]: embedded and custom TrueType faces, Spleen bitmap face
//! - [`layout`]: measuring pass that fixes the final height
//! - [`canvas`]: anti-aliased intensity buffer
//! - [`dither`]: threshold and bit packing
//!
//! ## Usage Example
//!
//! ```
//! use kitchen_print::document::{Block, Document, Span, TextBlock};
//! use kitchen_print::render::{FontSet, render_document};
//!
//! let mut doc = Document::new(570);
//! doc.push(Block::Text(TextBlock::new(Span::new("UniFood")).center()));
//!
//! let fonts = FontSet::builtin().unwrap();
//! let raster = render_document(&doc, &fonts, 570);
//! assert_eq!(raster.width_bytes(), 72);
//! ```

pub mod bidi;
pub mod canvas;
pub mod dither;
pub mod font;
pub mod layout;
pub mod shaping;

pub use font::FontSet;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::document::Document;
use crate::error::PrintError;

/// Default bound on a single rasterization.
pub const DEFAULT_RASTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Packed 1-bit image, one row every `width.div_ceil(8)` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRaster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RawRaster {
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Whether the dot at `(x, y)` prints. Out-of-range dots are white.
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y * self.width_bytes() + x / 8];
        (byte >> (7 - (x % 8))) & 1 == 1
    }

    /// Number of black dots in row `y`.
    pub fn row_ink(&self, y: usize) -> usize {
        let wb = self.width_bytes();
        self.data
            .get(y * wb..(y + 1) * wb)
            .map(|row| row.iter().map(|b| b.count_ones() as usize).sum())
            .unwrap_or(0)
    }

    pub fn to_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let luma = if self.is_black(x as usize, y as usize) {
                0u8
            } else {
                255u8
            };
            image::Luma([luma])
        })
    }

    /// Save as a black-on-white PNG.
    pub fn to_png(&self, path: &Path) -> Result<(), PrintError> {
        self.to_image()
            .save(path)
            .map_err(|e| PrintError::Image(format!("Failed to save PNG: {}", e)))
    }
}

/// Lay out, draw and pack a document at `width` dots.
pub fn render_document(doc: &Document, fonts: &FontSet, width: usize) -> RawRaster {
    let layout = layout::layout(doc, fonts, width);
    debug!(width, height = layout.height, ops = layout.ops.len(), "Document laid out");
    layout.paint(fonts).into_raster()
}

/// Document-to-raster converter with a bounded wait.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    fonts: Arc<FontSet>,
    width: usize,
    timeout: Duration,
}

impl Rasterizer {
    pub fn new(fonts: Arc<FontSet>, width: usize) -> Self {
        Self {
            fonts,
            width,
            timeout: DEFAULT_RASTER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render on the current thread, unbounded.
    pub fn render(&self, doc: &Document) -> RawRaster {
        render_document(doc, &self.fonts, self.width)
    }

    /// Render on the blocking pool. Fails with
    /// [`PrintError::RasterTimeout`] if the raster is not ready in time;
    /// the abandoned render is left to finish in the background.
    pub async fn rasterize(&self, doc: Document) -> Result<RawRaster, PrintError> {
        let fonts = Arc::clone(&self.fonts);
        let width = self.width;
        let task = tokio::task::spawn_blocking(move || render_document(&doc, &fonts, width));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(raster)) => Ok(raster),
            Ok(Err(e)) => Err(PrintError::Raster(format!("Render task failed: {}", e))),
            Err(_) => Err(PrintError::RasterTimeout(self.timeout.as_millis() as u64)),
        }
    }
}
