//! # Layout Pass
//!
//! Measures every block of a [`Document`] before anything is drawn, so the
//! canvas can be allocated at its exact final height:
//!
//! ```text
//! top margin
//! block 1   ← text: shape → wrap → bidi, one entry per line
//! block 2   ← row: cells placed from the start edge, tallest cell wins
//! ...
//! bottom margin (paper left before the cutter)
//! ```
//!
//! Widths are in printer dots. Document units are scaled by
//! `width / doc.width`, so the same document fits any head width.

use super::bidi::visual_line;
use super::canvas::{Canvas, Ink};
use super::font::FontSet;
use super::shaping::shape;
use crate::document::{Align, Block, Direction, Document, Span};

const TOP_MARGIN: f32 = 8.0;
const BOTTOM_MARGIN: f32 = 24.0;
const LINE_SPACING: f32 = 4.0;
const CELL_GAP: f32 = 10.0;
const ROW_PADDING: f32 = 4.0;
const BAND_PADDING: f32 = 6.0;
const DIVIDER_MARGIN: f32 = 6.0;
const DASH: f32 = 10.0;
const DASH_GAP: f32 = 6.0;

/// One positioned drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A single line already in visual order
    Text {
        x: f32,
        top: f32,
        text: String,
        px: f32,
        bold: bool,
        ink: Ink,
    },
    Fill {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    Dashes {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        dash: usize,
        gap: usize,
    },
}

/// A fully measured document.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub ops: Vec<DrawOp>,
}

impl Layout {
    /// Draw every operation onto a fresh canvas.
    pub fn paint(&self, fonts: &FontSet) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height);
        for op in &self.ops {
            match op {
                DrawOp::Text {
                    x,
                    top,
                    text,
                    px,
                    bold,
                    ink,
                } => fonts.draw(&mut canvas, text, *x, *top, *px, *bold, *ink),
                DrawOp::Fill {
                    x,
                    y,
                    width,
                    height,
                } => canvas.fill_rect(*x, *y, *width, *height),
                DrawOp::Dashes {
                    x,
                    y,
                    width,
                    height,
                    dash,
                    gap,
                } => {
                    let mut cx = *x;
                    while cx < x + width {
                        let w = (*dash).min(x + width - cx);
                        canvas.fill_rect(cx, *y, w, *height);
                        cx += dash + gap;
                    }
                }
            }
        }
        canvas
    }
}

struct Ctx<'a> {
    fonts: &'a FontSet,
    scale: f32,
    direction: Direction,
    ops: Vec<DrawOp>,
}

impl Ctx<'_> {
    fn px(&self, units: f32) -> f32 {
        units * self.scale
    }

    /// Shape, wrap and reorder a span for a column `max_width` dots wide.
    fn lines(&self, span: &Span, max_width: f32) -> Vec<String> {
        let px = self.px(span.size.pixel_height());
        wrap(self.fonts, &shape(&span.text), px, span.bold, max_width)
            .iter()
            .map(|line| visual_line(line, self.direction))
            .collect()
    }

    fn text_height(&self, span: &Span, lines: usize) -> f32 {
        let px = self.px(span.size.pixel_height());
        let lh = self.fonts.line_height(px) as f32;
        let n = lines.max(1) as f32;
        n * lh + (n - 1.0) * self.px(LINE_SPACING)
    }

    #[allow(clippy::too_many_arguments)]
    fn place_lines(
        &mut self,
        span: &Span,
        lines: Vec<String>,
        left: f32,
        width: f32,
        top: f32,
        align: Align,
        ink: Ink,
    ) {
        let px = self.px(span.size.pixel_height());
        let step = self.fonts.line_height(px) as f32 + self.px(LINE_SPACING);
        for (i, text) in lines.into_iter().enumerate() {
            let w = self.fonts.measure(&text, px, span.bold);
            let x = align_x(left, width, w, align, self.direction);
            self.ops.push(DrawOp::Text {
                x,
                top: top + i as f32 * step,
                text,
                px,
                bold: span.bold,
                ink,
            });
        }
    }
}

/// Lay out `doc` at `width` dots.
pub fn layout(doc: &Document, fonts: &FontSet, width: usize) -> Layout {
    let scale = if doc.width == 0 {
        1.0
    } else {
        width as f32 / doc.width as f32
    };
    let mut ctx = Ctx {
        fonts,
        scale,
        direction: doc.direction,
        ops: Vec::new(),
    };

    let pad = ctx.px(doc.padding as f32);
    let left = pad;
    let content = (width as f32 - 2.0 * pad).max(1.0);
    let mut y = ctx.px(TOP_MARGIN);

    for block in &doc.blocks {
        match block {
            Block::Text(tb) => {
                let band = if tb.inverted { ctx.px(BAND_PADDING) } else { 0.0 };
                let lines = ctx.lines(&tb.span, content - 2.0 * band);
                let text_h = ctx.text_height(&tb.span, lines.len());
                let (ink, total) = if tb.inverted {
                    let total = text_h + 2.0 * band;
                    ctx.ops.push(DrawOp::Fill {
                        x: left.round() as usize,
                        y: y.round() as usize,
                        width: content.round() as usize,
                        height: total.ceil() as usize,
                    });
                    (Ink::White, total)
                } else {
                    (Ink::Black, text_h)
                };
                ctx.place_lines(
                    &tb.span,
                    lines,
                    left + band,
                    content - 2.0 * band,
                    y + band,
                    tb.align,
                    ink,
                );
                y += total;
            }
            Block::Row(row) => {
                if row.cells.is_empty() {
                    continue;
                }
                let gap = ctx.px(CELL_GAP);
                let avail = (content - gap * (row.cells.len() - 1) as f32).max(1.0);
                let total_weight: f32 = row.cells.iter().map(|c| c.weight as f32).sum();

                // Cell columns from the start edge
                let mut cursor = match ctx.direction {
                    Direction::Rtl => left + content,
                    Direction::Ltr => left,
                };
                let mut cells = Vec::with_capacity(row.cells.len());
                for cell in &row.cells {
                    let w = avail * cell.weight as f32 / total_weight;
                    let cell_left = match ctx.direction {
                        Direction::Rtl => {
                            let l = cursor - w;
                            cursor = l - gap;
                            l
                        }
                        Direction::Ltr => {
                            let l = cursor;
                            cursor += w + gap;
                            l
                        }
                    };
                    let lines = ctx.lines(&cell.span, w);
                    let h = ctx.text_height(&cell.span, lines.len());
                    cells.push((cell, cell_left, w, lines, h));
                }

                let inner = cells.iter().map(|c| c.4).fold(0.0f32, f32::max);
                let row_pad = ctx.px(ROW_PADDING);
                for (cell, cell_left, w, lines, h) in cells {
                    let top = y + row_pad + (inner - h) / 2.0;
                    ctx.place_lines(&cell.span, lines, cell_left, w, top, cell.align, Ink::Black);
                }
                y += inner + 2.0 * row_pad;
            }
            Block::Divider(div) => {
                let margin = ctx.px(DIVIDER_MARGIN);
                let thickness = ctx.px(div.thickness as f32).round().max(1.0);
                y += margin;
                let (x, yy, w, h) = (
                    left.round() as usize,
                    y.round() as usize,
                    content.round() as usize,
                    thickness as usize,
                );
                ctx.ops.push(if div.dashed {
                    DrawOp::Dashes {
                        x,
                        y: yy,
                        width: w,
                        height: h,
                        dash: ctx.px(DASH).round().max(1.0) as usize,
                        gap: ctx.px(DASH_GAP).round().max(1.0) as usize,
                    }
                } else {
                    DrawOp::Fill {
                        x,
                        y: yy,
                        width: w,
                        height: h,
                    }
                });
                y += thickness + margin;
            }
            Block::Spacer(h) => y += ctx.px(*h as f32),
        }
    }

    y += ctx.px(BOTTOM_MARGIN);
    Layout {
        width,
        height: y.ceil().max(1.0) as usize,
        ops: ctx.ops,
    }
}

/// X position of a line `text_w` wide inside `[left, left + width)`.
fn align_x(left: f32, width: f32, text_w: f32, align: Align, direction: Direction) -> f32 {
    let right_edge = matches!(
        (align, direction),
        (Align::Start, Direction::Rtl) | (Align::End, Direction::Ltr)
    );
    let x = match align {
        Align::Center => left + (width - text_w) / 2.0,
        _ if right_edge => left + width - text_w,
        _ => left,
    };
    x.max(left)
}

/// Greedy word wrap on logical (shaped) text. Words wider than the column
/// are broken between characters.
pub fn wrap(fonts: &FontSet, text: &str, px: f32, bold: bool, max_width: f32) -> Vec<String> {
    let fits = |s: &str| fonts.measure(s, px, bold) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }

        for ch in word.chars() {
            current.push(ch);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Divider, Row, TextBlock, TextSize};
    use pretty_assertions::assert_eq;

    fn fonts() -> FontSet {
        FontSet::builtin().unwrap()
    }

    fn text_ops(layout: &Layout) -> Vec<(f32, f32, &str)> {
        layout
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, top, text, .. } => Some((*x, *top, text.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_wrap_short_text_one_line() {
        // Bitmap advance at 24px is 12 dots
        assert_eq!(wrap(&fonts(), "a b", 24.0, false, 100.0), vec!["a b"]);
    }

    #[test]
    fn test_wrap_by_words() {
        let lines = wrap(&fonts(), "aaaa bbbb cccc", 24.0, false, 110.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_wrap_breaks_long_word() {
        let lines = wrap(&fonts(), "abcdefghij", 24.0, false, 48.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty_keeps_one_line() {
        assert_eq!(wrap(&fonts(), "", 24.0, false, 100.0), vec![""]);
    }

    #[test]
    fn test_empty_document_is_margins_only() {
        let doc = Document::new(570);
        let layout = layout(&doc, &fonts(), 570);
        assert_eq!(layout.height, (TOP_MARGIN + BOTTOM_MARGIN) as usize);
        assert!(layout.ops.is_empty());
    }

    #[test]
    fn test_rtl_start_aligns_right() {
        let mut doc = Document::new(570);
        doc.push(Block::Text(TextBlock::new(Span::new("A").size(TextSize::Small))));
        let layout = layout(&doc, &fonts(), 570);

        let (x, _, _) = text_ops(&layout)[0];
        // 22px bitmap glyph advance is 11 dots; right padding is 8
        assert_eq!(x, 570.0 - 8.0 - 11.0);
    }

    #[test]
    fn test_ltr_start_aligns_left() {
        let mut doc = Document::new(570);
        doc.direction = Direction::Ltr;
        doc.push(Block::Text(TextBlock::new(Span::new("A"))));
        let layout = layout(&doc, &fonts(), 570);
        assert_eq!(text_ops(&layout)[0].0, 8.0);
    }

    #[test]
    fn test_rtl_first_cell_is_rightmost() {
        let mut doc = Document::new(570);
        doc.push(Block::Row(Row::new(vec![
            Cell::new(Span::new("1"), 1),
            Cell::new(Span::new("2"), 4),
        ])));
        let layout = layout(&doc, &fonts(), 570);
        let ops = text_ops(&layout);

        let first = ops.iter().find(|o| o.2 == "1").unwrap();
        let second = ops.iter().find(|o| o.2 == "2").unwrap();
        assert!(first.0 > second.0);
    }

    #[test]
    fn test_inverted_band_is_filled() {
        let mut doc = Document::new(570);
        doc.push(Block::Text(TextBlock::new(Span::new("X")).center().inverted()));
        let layout = layout(&doc, &fonts(), 570);

        assert!(matches!(layout.ops[0], DrawOp::Fill { x: 8, width: 554, .. }));
        assert!(matches!(layout.ops[1], DrawOp::Text { ink: Ink::White, .. }));
    }

    #[test]
    fn test_height_sums_blocks() {
        let mut doc = Document::new(570);
        doc.push(Block::Spacer(10));
        doc.push(Block::Divider(Divider::solid()));
        let layout = layout(&doc, &fonts(), 570);

        let expected = TOP_MARGIN + 10.0 + 2.0 * DIVIDER_MARGIN + 3.0 + BOTTOM_MARGIN;
        assert_eq!(layout.height, expected as usize);
    }

    #[test]
    fn test_scales_to_narrower_head() {
        let mut doc = Document::new(570);
        doc.push(Block::Spacer(100));
        let narrow = layout(&doc, &fonts(), 285);
        let full = layout(&doc, &fonts(), 570);
        assert!(narrow.height < full.height);
        assert_eq!(narrow.width, 285);
    }

    #[test]
    fn test_long_text_wraps_to_more_lines() {
        let mut doc = Document::new(570);
        doc.push(Block::Text(TextBlock::new(Span::new("word ".repeat(60)))));
        let layout = layout(&doc, &fonts(), 570);
        assert!(text_ops(&layout).len() > 1);
    }

    #[test]
    fn test_paint_dashes() {
        let mut doc = Document::new(570);
        doc.push(Block::Divider(Divider::dashed()));
        let layout = layout(&doc, &fonts(), 570);
        let canvas = layout.paint(&fonts());

        let y = (TOP_MARGIN + DIVIDER_MARGIN) as usize;
        assert!(canvas.get(8, y) > 0.5);
        assert!(canvas.get(8 + 12, y) < 0.5);
    }
}
