//! # Receipt Document Model
//!
//! A fixed-width, top-to-bottom list of blocks that the rasterizer lays out
//! and draws. The receipt renderer builds one of these from an order; the
//! rasterizer never looks at orders.
//!
//! ```
//! use kitchen_print::document::*;
//!
//! let doc = Document {
//!     blocks: vec![
//!         Block::Text(TextBlock::new(Span::new("UniFood").size(TextSize::XLarge).bold()).center()),
//!         Block::Divider(Divider::solid()),
//!         Block::Row(Row::new(vec![
//!             Cell::new(Span::new("کد آشپزخانه"), 1),
//!             Cell::new(Span::new("412").size(TextSize::Huge).bold(), 1).end(),
//!         ])),
//!     ],
//!     ..Default::default()
//! };
//! assert_eq!(doc.width, 570);
//! ```

use crate::printer::DEFAULT_WIDTH_DOTS;

/// Type sizes. Pixel heights are em sizes at 203 DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
    XLarge,
    /// Reserved for the kitchen code
    Huge,
}

impl TextSize {
    pub fn pixel_height(self) -> f32 {
        match self {
            TextSize::Small => 22.0,
            TextSize::Normal => 28.0,
            TextSize::Large => 36.0,
            TextSize::XLarge => 48.0,
            TextSize::Huge => 80.0,
        }
    }
}

/// Logical alignment. `Start` is the right edge in a right-to-left document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Base paragraph direction of the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Rtl,
    Ltr,
}

/// A run of text in one style.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub text: String,
    pub size: TextSize,
    pub bold: bool,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A paragraph spanning the full content width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub span: Span,
    pub align: Align,
    /// White text on a black band
    pub inverted: bool,
}

impl TextBlock {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            ..Default::default()
        }
    }

    pub fn center(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }
}

/// One column of a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub span: Span,
    /// Share of the row width relative to the other cells
    pub weight: u16,
    pub align: Align,
}

impl Cell {
    pub fn new(span: Span, weight: u16) -> Self {
        Self {
            span,
            weight: weight.max(1),
            align: Align::Start,
        }
    }

    pub fn center(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn end(mut self) -> Self {
        self.align = Align::End;
        self
    }
}

/// Cells laid side by side, first cell at the start edge. Each cell wraps
/// independently; the row is as tall as its tallest cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// Horizontal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divider {
    pub thickness: u16,
    pub dashed: bool,
}

impl Divider {
    pub fn solid() -> Self {
        Self {
            thickness: 3,
            dashed: false,
        }
    }

    pub fn dashed() -> Self {
        Self {
            thickness: 2,
            dashed: true,
        }
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::solid()
    }
}

/// Document building blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Row(Row),
    Divider(Divider),
    /// Vertical gap in dots
    Spacer(u16),
}

/// A fixed-width visual document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Nominal width in layout units (dots)
    pub width: usize,
    pub direction: Direction,
    /// Left/right padding in dots
    pub padding: usize,
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH_DOTS as usize,
            direction: Direction::Rtl,
            padding: 8,
            blocks: Vec::new(),
        }
    }
}

impl Document {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// All text carried by the document, in block order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Text(t) => out.push(t.span.text.as_str()),
                Block::Row(r) => out.extend(r.cells.iter().map(|c| c.span.text.as_str())),
                Block::Divider(_) | Block::Spacer(_) => {}
            }
        }
        out
    }
}
