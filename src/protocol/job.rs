//! Print job assembly: one rasterized receipt framed as a complete ESC/POS job.
//!
//! ```text
//! ESC @           initialize
//! ESC a 1         center the image
//! GS v 0 ...      raster bands
//! ESC d n         feed
//! GS V 66 0       feed to cutter and full cut
//! ```

use super::commands::{self, Justification};
use super::graphics;
use crate::printer::PrinterConfig;
use crate::render::RawRaster;

/// Build the bytes for printing one raster image and cutting the paper.
pub fn build_print_job(raster: &RawRaster, config: &PrinterConfig) -> Vec<u8> {
    let mut data = Vec::with_capacity(raster.data.len() + 64);

    data.extend(commands::init());
    data.extend(commands::justify(Justification::Center));
    data.extend(graphics::raster_chunked(
        raster.width as u16,
        raster.height,
        &raster.data,
        config.max_chunk_rows as usize,
    ));
    data.extend(commands::justify(Justification::Left));
    if config.feed_lines_before_cut > 0 {
        data.extend(commands::feed_lines(config.feed_lines_before_cut));
    }
    data.extend(commands::cut_full_feed(0));

    data
}
