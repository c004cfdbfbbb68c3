//! # 1-bit Conversion
//!
//! Thermal heads print a dot or nothing. Receipt text is rendered with
//! anti-aliased coverage, so each pixel is thresholded at 50% and the
//! result packed eight dots per byte:
//!
//! ```text
//! dots:   ■ □ □ ■ ■ ■ □ □ | ■ ■ □ ...
//! byte:   1 0 0 1 1 1 0 0 = 0x9C
//! ```
//!
//! - Bit 7 (MSB) is the leftmost dot
//! - 1 = black, 0 = white
//! - Rows are padded with white to a whole byte

/// Intensity at or above which a dot prints.
pub const THRESHOLD: f32 = 0.5;

/// Pack a row of boolean pixel values into bytes.
///
/// ```
/// use kitchen_print::render::dither::pack_row;
///
/// let row = [true, false, false, true, true, true, false, false, true];
/// assert_eq!(pack_row(&row), vec![0x9C, 0x80]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// Threshold a row-major intensity buffer and pack every row.
pub fn pack_intensity(data: &[f32], width: usize, height: usize) -> Vec<u8> {
    let width_bytes = width.div_ceil(8);
    let mut out = Vec::with_capacity(width_bytes * height);
    let mut row = vec![false; width];

    for y in 0..height {
        for (x, dot) in row.iter_mut().enumerate() {
            *dot = data.get(y * width + x).is_some_and(|&v| v >= THRESHOLD);
        }
        out.extend(pack_row(&row));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_row_msb_first() {
        assert_eq!(pack_row(&[true; 8]), vec![0xFF]);
        assert_eq!(pack_row(&[true, false, false, false, false, false, false, false]), vec![0x80]);
        assert_eq!(pack_row(&[false, false, false, false, false, false, false, true]), vec![0x01]);
    }

    #[test]
    fn test_pack_row_padding_is_white() {
        assert_eq!(pack_row(&[true; 10]), vec![0xFF, 0xC0]);
        assert!(pack_row(&[]).is_empty());
    }

    #[test]
    fn test_pack_intensity_row_width() {
        let width = 570;
        let data = vec![1.0f32; width * 3];
        let packed = pack_intensity(&data, width, 3);

        assert_eq!(packed.len(), 72 * 3);
        // 570 = 71 * 8 + 2: last byte keeps two dots
        assert_eq!(packed[71], 0xC0);
        assert_eq!(packed[70], 0xFF);
    }

    #[test]
    fn test_threshold_boundary() {
        let packed = pack_intensity(&[0.49, 0.5, 0.9, 0.0], 4, 1);
        assert_eq!(packed, vec![0b0110_0000]);
    }
}
