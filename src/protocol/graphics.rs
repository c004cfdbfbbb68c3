//! # ESC/POS Raster Graphics
//!
//! Monochrome raster bit images (`GS v 0`).
//!
//! ## Bit Packing
//!
//! Each bit is one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```
//!
//! Rows are `width_dots.div_ceil(8)` bytes; a width that is not a multiple
//! of 8 (570 dots → 72 bytes) carries white padding bits at the right edge.

use super::commands::{GS, u16_le};

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Scale mode (0 = normal density)
/// - `xL, xH`: Width in **bytes**, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height
///
/// ## Example
///
/// ```
/// use kitchen_print::protocol::graphics;
///
/// let data = vec![0x00; 72 * 10];
/// let cmd = graphics::raster(570, 10, &data);
///
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
/// assert_eq!(cmd[4], 72); // xL
/// assert_eq!(cmd[6], 10); // yL
/// assert_eq!(cmd.len(), 8 + 72 * 10);
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);
    let expected_len = width_bytes as usize * height as usize;

    debug_assert!(
        data.len() == expected_len,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        expected_len,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(0); // m = 0 (normal)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

/// Emit a tall image as consecutive `GS v 0` commands of at most
/// `max_rows` rows each.
///
/// Many printers cap a single raster command well below 65535 rows and
/// buffer the whole command before printing; bands keep both in check.
pub fn raster_chunked(width_dots: u16, height: usize, data: &[u8], max_rows: usize) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8) as usize;
    let max_rows = max_rows.clamp(1, u16::MAX as usize);
    let mut cmd = Vec::with_capacity(data.len() + 8 * height.div_ceil(max_rows));

    let mut row = 0;
    while row < height {
        let rows = max_rows.min(height - row);
        let start = row * width_bytes;
        let end = start + rows * width_bytes;
        cmd.extend(raster(width_dots, rows as u16, &data[start..end]));
        row += rows;
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header() {
        let data = vec![0xFF; 72 * 100];
        let cmd = raster(576, 100, &data);

        assert_eq!(cmd[0], 0x1D); // GS
        assert_eq!(cmd[1], 0x76); // 'v'
        assert_eq!(cmd[2], 0x30); // '0'
        assert_eq!(cmd[3], 0); // m
        assert_eq!(cmd[4], 72); // xL
        assert_eq!(cmd[5], 0); // xH
        assert_eq!(cmd[6], 100); // yL
        assert_eq!(cmd[7], 0); // yH
    }

    #[test]
    fn test_raster_large_height() {
        let height: u16 = 500;
        let data = vec![0xFF; 72 * height as usize];
        let cmd = raster(576, height, &data);

        // 500 = 0x01F4
        assert_eq!(cmd[6], 0xF4);
        assert_eq!(cmd[7], 0x01);
    }

    #[test]
    fn test_raster_width_rounding() {
        // 570 dots round up to 72 bytes
        let data = vec![0x00; 72 * 4];
        let cmd = raster(570, 4, &data);
        assert_eq!(cmd[4], 72);
    }

    #[test]
    fn test_raster_preserves_data() {
        let data: Vec<u8> = (0..72 * 50).map(|i| (i % 256) as u8).collect();
        let cmd = raster(576, 50, &data);
        assert_eq!(&cmd[8..], &data[..]);
    }

    #[test]
    fn test_raster_chunked_splits_rows() {
        let data: Vec<u8> = (0..72 * 10).map(|i| (i % 251) as u8).collect();
        let cmd = raster_chunked(570, 10, &data, 4);

        // Three commands: 4 + 4 + 2 rows
        assert_eq!(cmd.len(), 3 * 8 + data.len());
        assert_eq!(cmd[6], 4);
        let second = 8 + 72 * 4;
        assert_eq!(&cmd[second..second + 4], &[0x1D, 0x76, 0x30, 0x00]);
        let third = second + 8 + 72 * 4;
        assert_eq!(cmd[third + 6], 2);
        assert_eq!(&cmd[third + 8..], &data[72 * 8..]);
    }

    #[test]
    fn test_raster_chunked_single_band() {
        let data = vec![0xAA; 72 * 3];
        assert_eq!(raster_chunked(570, 3, &data, 256), raster(570, 3, &data));
    }
}
