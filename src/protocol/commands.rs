//! # ESC/POS Protocol Commands
//!
//! Basic control commands understood by ESC/POS network receipt printers
//! (Epson TM series, Xprinter, Rongta and most 80mm kitchen printers).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC a n`, `GS V m n`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics (`GS v 0`) and paper cutting (`GS V`).
pub const GS: u8 = 0x1D;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets the printer to its power-on modes.
/// Sent at the start of every job.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ## Example
///
/// ```
/// use kitchen_print::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// JUSTIFICATION
// ============================================================================

/// Horizontal justification for the current line or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

/// # Select Justification (ESC a n)
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// `n` = 0 left, 1 center, 2 right.
#[inline]
pub fn justify(justification: Justification) -> Vec<u8> {
    let n = match justification {
        Justification::Left => 0,
        Justification::Center => 1,
        Justification::Right => 2,
    };
    vec![ESC, b'a', n]
}

// ============================================================================
// PAPER FEED AND CUT
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

/// # Feed and Full Cut (GS V 66 n)
///
/// Feeds `n` motion units past the cutter, then performs a full cut.
/// The printer accounts for the head-to-cutter distance itself, so the
/// last printed line is never cut through.
///
/// | Format  | Bytes       |
/// |---------|-------------|
/// | ASCII   | GS V B n    |
/// | Hex     | 1D 56 42 n  |
///
/// ## Example
///
/// ```
/// use kitchen_print::protocol::commands;
///
/// assert_eq!(commands::cut_full_feed(3), vec![0x1D, 0x56, 0x42, 3]);
/// ```
#[inline]
pub fn cut_full_feed(n: u8) -> Vec<u8> {
    vec![GS, b'V', 66, n]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use kitchen_print::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(570), [0x3A, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}
