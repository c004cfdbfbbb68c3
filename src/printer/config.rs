//! # Printer Configuration
//!
//! Hardware characteristics of the kitchen printer a job is rendered for.
//! An 80mm printer at 203 DPI (8 dots/mm) prints about 71mm of its
//! 570-dot raster width.

/// Default raster width in dots for the kitchen printers in use.
pub const DEFAULT_WIDTH_DOTS: u16 = 570;

/// # Printer Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Raster width in dots. Every rendered receipt is exactly this wide.
    pub width_dots: u16,

    /// Maximum rows per `GS v 0` command
    pub max_chunk_rows: u16,

    /// Lines fed after the image, before the cut command
    pub feed_lines_before_cut: u8,
}

impl PrinterConfig {
    /// Generic 80mm ESC/POS kitchen printer.
    pub const KITCHEN_80MM: PrinterConfig = PrinterConfig {
        width_dots: DEFAULT_WIDTH_DOTS,
        max_chunk_rows: 256,
        feed_lines_before_cut: 3,
    };

    /// Same printer with a different raster width.
    pub fn with_width(width_dots: u16) -> Self {
        Self {
            width_dots,
            ..Self::KITCHEN_80MM
        }
    }

    /// Width in bytes of one packed raster row.
    pub fn width_bytes(&self) -> usize {
        (self.width_dots as usize).div_ceil(8)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::KITCHEN_80MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width() {
        let config = PrinterConfig::default();
        assert_eq!(config.width_dots, 570);
        assert_eq!(config.width_bytes(), 72);
    }

    #[test]
    fn test_with_width() {
        let config = PrinterConfig::with_width(384);
        assert_eq!(config.width_bytes(), 48);
        assert_eq!(config.max_chunk_rows, 256);
    }
}
