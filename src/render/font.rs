//! # Receipt Fonts
//!
//! Two kinds of face can draw receipt text:
//!
//! - **TrueType** (`ab_glyph`): DejaVu Sans regular and bold are embedded
//!   and cover Latin, digits and the Arabic presentation forms Persian
//!   needs. Any other TTF/OTF can be loaded from disk instead. A custom
//!   face without a bold companion is emboldened by double-striking.
//! - **Bitmap** (`spleen-font`): the built-in Spleen 12×24 face, scaled by
//!   nearest neighbour. It is Latin only; characters it lacks are drawn as
//!   boxes so the layout stays intact.
//!
//! Coverage is accumulated into a [`Canvas`] and thresholded later.

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use spleen_font::{PSF2Font, FONT_12X24};

use super::canvas::{Canvas, Ink};
use crate::error::PrintError;

static DEJAVU_REGULAR: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");
static DEJAVU_BOLD: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

const BITMAP_W: usize = 12;
const BITMAP_H: usize = 24;

/// Font faces used for a receipt.
#[derive(Clone)]
pub enum FontSet {
    Ttf {
        regular: FontArc,
        bold: Option<FontArc>,
    },
    Bitmap,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSet::Ttf { bold, .. } => f
                .debug_struct("Ttf")
                .field("bold", &bold.is_some())
                .finish(),
            FontSet::Bitmap => f.write_str("Bitmap"),
        }
    }
}

impl FontSet {
    /// The embedded DejaVu Sans faces.
    pub fn embedded() -> Result<Self, PrintError> {
        let face = |bytes: &'static [u8], name: &str| {
            FontArc::try_from_slice(bytes)
                .map_err(|e| PrintError::Font(format!("embedded {name}: {e}")))
        };
        Ok(FontSet::Ttf {
            regular: face(DEJAVU_REGULAR, "DejaVu Sans")?,
            bold: Some(face(DEJAVU_BOLD, "DejaVu Sans Bold")?),
        })
    }

    /// The built-in bitmap face.
    pub fn builtin() -> Result<Self, PrintError> {
        PSF2Font::new(FONT_12X24)
            .map_err(|_| PrintError::Font("built-in bitmap font is unreadable".into()))?;
        Ok(FontSet::Bitmap)
    }

    /// Load a TrueType face, with an optional bold companion.
    pub fn from_files(regular: &Path, bold: Option<&Path>) -> Result<Self, PrintError> {
        Ok(FontSet::Ttf {
            regular: load_ttf(regular)?,
            bold: bold.map(load_ttf).transpose()?,
        })
    }

    /// The configured TrueType face, or the embedded one when none is set.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Result<Self, PrintError> {
        match regular {
            Some(path) => Self::from_files(path, bold),
            None => Self::embedded(),
        }
    }

    /// Characters of `text` (already shaped) that this face cannot draw.
    /// Whitespace and controls are ignored; each character is listed once.
    pub fn missing_glyphs(&self, text: &str) -> Vec<char> {
        let mut spleen = match self {
            FontSet::Bitmap => PSF2Font::new(FONT_12X24).ok(),
            FontSet::Ttf { .. } => None,
        };
        let mut missing = Vec::new();
        for ch in text.chars() {
            if ch.is_whitespace() || ch.is_control() || missing.contains(&ch) {
                continue;
            }
            let covered = match self {
                FontSet::Ttf { regular, .. } => regular.glyph_id(ch).0 != 0,
                FontSet::Bitmap => spleen
                    .as_mut()
                    .is_some_and(|font| bitmap_glyph(font, ch).is_some()),
            };
            if !covered {
                missing.push(ch);
            }
        }
        missing
    }

    fn face(&self, bold: bool) -> Option<(&FontArc, bool)> {
        match self {
            FontSet::Ttf { regular, bold: b } => Some(match (bold, b) {
                (true, Some(face)) => (face, false),
                (true, None) => (regular, true),
                (false, _) => (regular, false),
            }),
            FontSet::Bitmap => None,
        }
    }

    /// Advance width of `text` at `px` pixels per em.
    pub fn measure(&self, text: &str, px: f32, bold: bool) -> f32 {
        match self.face(bold) {
            Some((font, synthetic)) => {
                let scaled = font.as_scaled(PxScale::from(px));
                let mut width = 0.0;
                let mut prev = None;
                for ch in text.chars() {
                    let id = font.glyph_id(ch);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width + if synthetic { embolden_offset(px) } else { 0.0 }
            }
            None => {
                let advance = bitmap_advance(px);
                let count = text.chars().count() as f32;
                count * advance + if bold { embolden_offset(px) } else { 0.0 }
            }
        }
    }

    /// Height of one text line at `px` pixels per em.
    pub fn line_height(&self, px: f32) -> usize {
        match self.face(false) {
            Some((font, _)) => {
                let scaled = font.as_scaled(PxScale::from(px));
                (scaled.ascent() - scaled.descent()).ceil().max(1.0) as usize
            }
            None => bitmap_height(px),
        }
    }

    /// Draw `text` (already in visual order) with its top-left corner at
    /// `(x, top)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: f32,
        top: f32,
        px: f32,
        bold: bool,
        ink: Ink,
    ) {
        match self.face(bold) {
            Some((font, synthetic)) => {
                draw_ttf(canvas, font, text, x, top, px, ink);
                if synthetic {
                    draw_ttf(canvas, font, text, x + embolden_offset(px), top, px, ink);
                }
            }
            None => {
                draw_bitmap(canvas, text, x, top, px, ink);
                if bold {
                    draw_bitmap(canvas, text, x + embolden_offset(px), top, px, ink);
                }
            }
        }
    }
}

fn load_ttf(path: &Path) -> Result<FontArc, PrintError> {
    let bytes = std::fs::read(path)
        .map_err(|e| PrintError::Font(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| PrintError::Font(format!("{}: {}", path.display(), e)))
}

fn embolden_offset(px: f32) -> f32 {
    (px / 28.0).round().max(1.0)
}

fn bitmap_height(px: f32) -> usize {
    px.round().max(1.0) as usize
}

fn bitmap_advance(px: f32) -> f32 {
    (bitmap_height(px) * BITMAP_W / BITMAP_H).max(1) as f32
}

fn draw_ttf(canvas: &mut Canvas, font: &FontArc, text: &str, x: f32, top: f32, px: f32, ink: Ink) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let baseline = top + scaled.ascent();

    let mut caret = x;
    let mut prev = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let cx = gx as i64 + bounds.min.x as i64;
                let cy = gy as i64 + bounds.min.y as i64;
                canvas.paint(cx, cy, coverage, ink);
            });
        }
    }
}

fn draw_bitmap(canvas: &mut Canvas, text: &str, x: f32, top: f32, px: f32, ink: Ink) {
    let cell_h = bitmap_height(px);
    let advance = bitmap_advance(px);
    let cell_w = advance as usize;
    let top = top.round() as i64;

    // A fresh parser per line: lookups need `&mut`, and the data is static.
    let mut spleen = PSF2Font::new(FONT_12X24).ok();

    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let left = (x + i as f32 * advance).round() as i64;
        let src = spleen
            .as_mut()
            .and_then(|font| bitmap_glyph(font, ch))
            .unwrap_or_else(box_glyph);

        for dy in 0..cell_h {
            for dx in 0..cell_w {
                let sx = dx * BITMAP_W / cell_w;
                let sy = dy * BITMAP_H / cell_h;
                if src[sy * BITMAP_W + sx] {
                    canvas.paint(left + dx as i64, top + dy as i64, 1.0, ink);
                }
            }
        }
    }
}

fn bitmap_glyph(font: &mut PSF2Font, ch: char) -> Option<Vec<bool>> {
    let mut utf8 = [0u8; 4];
    let glyph = font.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes())?;

    let mut bits = vec![false; BITMAP_W * BITMAP_H];
    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < BITMAP_H && col_x < BITMAP_W {
                bits[row_y * BITMAP_W + col_x] = on;
            }
        }
    }
    Some(bits)
}

/// Outline box for characters the bitmap face lacks.
fn box_glyph() -> Vec<bool> {
    let mut bits = vec![false; BITMAP_W * BITMAP_H];
    let (x0, x1, y0, y1) = (1, BITMAP_W - 2, 3, BITMAP_H - 3);
    for x in x0..=x1 {
        bits[y0 * BITMAP_W + x] = true;
        bits[y1 * BITMAP_W + x] = true;
    }
    for y in y0..=y1 {
        bits[y * BITMAP_W + x0] = true;
        bits[y * BITMAP_W + x1] = true;
    }
    bits
}
