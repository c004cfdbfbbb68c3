//! # Kitchen Receipt Renderer
//!
//! Turns an [`Order`] into a right-to-left [`Document`]:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │           UniFood            │  brand header
//! │███████ سفارش آشپزخانه ███████│  inverted banner
//! │ شماره سفارش   ORD-2025-000777 │
//! │ کد آشپزخانه             412  │  largest type
//! │ زمان سفارش             12:30 │
//! │──────────────────────────────│
//! │ تعداد │ نام غذا              │
//! │   2   │ چلوکباب کوبیده       │
//! │──────────────────────────────│
//! │      تاریخ: 1404/02/01       │  footer
//! └──────────────────────────────┘
//! ```
//!
//! Rendering is total: missing or blank fields fall back to placeholders,
//! so a malformed order can never wedge the print queue.

use crate::document::{Block, Cell, Divider, Document, Row, Span, TextBlock, TextSize};
use crate::order::Order;
use crate::printer::DEFAULT_WIDTH_DOTS;

/// Shown for any missing order field.
pub const PLACEHOLDER: &str = "-";

/// Fixed receipt wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLabels {
    pub banner: String,
    pub order_number: String,
    pub kitchen_code: String,
    pub order_time: String,
    pub qty: String,
    pub item: String,
    pub date: String,
    pub no_items: String,
}

impl ReceiptLabels {
    /// Every label, in receipt order.
    pub fn texts(&self) -> [&str; 8] {
        [
            &self.banner,
            &self.order_number,
            &self.kitchen_code,
            &self.order_time,
            &self.qty,
            &self.item,
            &self.date,
            &self.no_items,
        ]
    }
}

impl Default for ReceiptLabels {
    fn default() -> Self {
        Self {
            banner: "سفارش آشپزخانه".into(),
            order_number: "شماره سفارش".into(),
            kitchen_code: "کد آشپزخانه".into(),
            order_time: "زمان سفارش".into(),
            qty: "تعداد".into(),
            item: "نام غذا".into(),
            date: "تاریخ".into(),
            no_items: "بدون آیتم".into(),
        }
    }
}

/// Receipt branding and geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptStyle {
    /// Latin brand name printed at the top
    pub brand: String,
    /// Nominal document width in dots
    pub width: usize,
    pub labels: ReceiptLabels,
}

impl Default for ReceiptStyle {
    fn default() -> Self {
        Self {
            brand: "UniFood".into(),
            width: DEFAULT_WIDTH_DOTS as usize,
            labels: ReceiptLabels::default(),
        }
    }
}

/// Column weights of the items table: quantity, then name.
const QTY_WEIGHT: u16 = 1;
const NAME_WEIGHT: u16 = 4;

/// Render a kitchen receipt document for an order.
pub fn render_receipt(order: &Order, style: &ReceiptStyle) -> Document {
    let labels = &style.labels;
    let mut doc = Document::new(style.width);

    // Brand header
    doc.push(Block::Text(
        TextBlock::new(Span::new(style.brand.as_str()).size(TextSize::XLarge).bold()).center(),
    ));
    doc.push(Block::Spacer(6));

    // Kitchen-order banner
    doc.push(Block::Text(
        TextBlock::new(Span::new(labels.banner.as_str()).size(TextSize::Large).bold())
            .center()
            .inverted(),
    ));
    doc.push(Block::Spacer(10));

    // Information block
    doc.push(info_row(
        &labels.order_number,
        Span::new(or_placeholder(&order.id)).bold(),
    ));
    doc.push(info_row(
        &labels.kitchen_code,
        Span::new(or_placeholder(&order.kitchen_number))
            .size(TextSize::Huge)
            .bold(),
    ));
    doc.push(info_row(
        &labels.order_time,
        Span::new(or_placeholder(&order.time)),
    ));
    doc.push(Block::Spacer(6));
    doc.push(Block::Divider(Divider::solid()));

    // Items table
    doc.push(Block::Row(Row::new(vec![
        Cell::new(Span::new(labels.qty.as_str()).size(TextSize::Small).bold(), QTY_WEIGHT)
            .center(),
        Cell::new(Span::new(labels.item.as_str()).size(TextSize::Small).bold(), NAME_WEIGHT),
    ])));
    doc.push(Block::Divider(Divider::dashed()));

    if order.items.is_empty() {
        doc.push(Block::Text(
            TextBlock::new(Span::new(labels.no_items.as_str())).center(),
        ));
    } else {
        for (i, item) in order.items.iter().enumerate() {
            if i > 0 {
                doc.push(Block::Divider(Divider::dashed()));
            }
            doc.push(Block::Row(Row::new(vec![
                Cell::new(
                    Span::new(item.qty.to_string()).size(TextSize::XLarge).bold(),
                    QTY_WEIGHT,
                )
                .center(),
                Cell::new(
                    Span::new(or_placeholder(&item.name)).size(TextSize::Normal),
                    NAME_WEIGHT,
                ),
            ])));
        }
    }

    // Footer
    doc.push(Block::Divider(Divider::solid()));
    doc.push(Block::Spacer(4));
    doc.push(Block::Text(
        TextBlock::new(
            Span::new(format!("{}: {}", labels.date, or_placeholder(&order.date)))
                .size(TextSize::Small),
        )
        .center(),
    ));

    doc
}

fn info_row(label: &str, value: Span) -> Block {
    Block::Row(Row::new(vec![
        Cell::new(Span::new(label), 1),
        Cell::new(value, 1).end(),
    ]))
}

fn or_placeholder(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Align;
    use crate::order::OrderItem;
    use pretty_assertions::assert_eq;

    fn sample_order() -> Order {
        Order {
            id: "ORD-2025-000777".into(),
            kitchen_number: "412".into(),
            restaurant_id: "kaktus".into(),
            items: vec![OrderItem::new("چلوکباب کوبیده", 2)],
            date: "1404/02/01".into(),
            time: "12:30".into(),
        }
    }

    fn find_span<'a>(doc: &'a Document, text: &str) -> Option<&'a Span> {
        doc.blocks.iter().find_map(|b| match b {
            Block::Text(t) if t.span.text == text => Some(&t.span),
            Block::Row(r) => r.cells.iter().find(|c| c.span.text == text).map(|c| &c.span),
            _ => None,
        })
    }

    #[test]
    fn test_contains_order_fields() {
        let doc = render_receipt(&sample_order(), &ReceiptStyle::default());
        let texts = doc.texts();

        for expected in ["UniFood", "ORD-2025-000777", "412", "12:30", "چلوکباب کوبیده", "2"] {
            assert!(texts.contains(&expected), "missing {expected}: {texts:?}");
        }
        assert!(texts.iter().any(|t| t.contains("1404/02/01")));
    }

    #[test]
    fn test_block_order() {
        let doc = render_receipt(&sample_order(), &ReceiptStyle::default());
        let texts = doc.texts();
        let pos = |s: &str| texts.iter().position(|t| t.contains(s)).unwrap();

        assert!(pos("UniFood") < pos("سفارش آشپزخانه"));
        assert!(pos("سفارش آشپزخانه") < pos("ORD-2025-000777"));
        assert!(pos("ORD-2025-000777") < pos("412"));
        assert!(pos("412") < pos("12:30"));
        assert!(pos("12:30") < pos("چلوکباب"));
        assert!(pos("چلوکباب") < pos("1404/02/01"));
    }

    #[test]
    fn test_kitchen_code_is_largest() {
        let doc = render_receipt(&sample_order(), &ReceiptStyle::default());
        let code = find_span(&doc, "412").unwrap();
        assert_eq!(code.size, TextSize::Huge);

        for block in &doc.blocks {
            let spans: Vec<&Span> = match block {
                Block::Text(t) => vec![&t.span],
                Block::Row(r) => r.cells.iter().map(|c| &c.span).collect(),
                _ => vec![],
            };
            for span in spans {
                assert!(span.size.pixel_height() <= code.size.pixel_height());
            }
        }
    }

    #[test]
    fn test_quantity_larger_and_bolder_than_name() {
        let doc = render_receipt(&sample_order(), &ReceiptStyle::default());
        let qty = find_span(&doc, "2").unwrap();
        let name = find_span(&doc, "چلوکباب کوبیده").unwrap();

        assert!(qty.bold && !name.bold);
        assert!(qty.size.pixel_height() > name.size.pixel_height());
    }

    #[test]
    fn test_quantity_is_first_column() {
        let doc = render_receipt(&sample_order(), &ReceiptStyle::default());
        let row = doc
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Row(r) if r.cells.iter().any(|c| c.span.text == "چلوکباب کوبیده") => Some(r),
                _ => None,
            })
            .unwrap();

        assert_eq!(row.cells[0].span.text, "2");
        assert_eq!(row.cells[0].align, Align::Center);
        assert!(row.cells[1].weight > row.cells[0].weight);
    }

    #[test]
    fn test_empty_order_uses_placeholders() {
        let doc = render_receipt(&Order::default(), &ReceiptStyle::default());
        let texts = doc.texts();

        assert!(texts.contains(&"بدون آیتم"));
        assert_eq!(texts.iter().filter(|t| **t == PLACEHOLDER).count(), 3);
        assert!(texts.contains(&"تاریخ: -"));
    }

    #[test]
    fn test_blank_item_name() {
        let order = Order {
            items: vec![OrderItem::new("   ", 1)],
            ..sample_order()
        };
        let doc = render_receipt(&order, &ReceiptStyle::default());
        assert!(doc.texts().contains(&PLACEHOLDER));
    }

    #[test]
    fn test_custom_brand_and_width() {
        let style = ReceiptStyle {
            brand: "Kaktus Cafe".into(),
            width: 384,
            ..Default::default()
        };
        let doc = render_receipt(&sample_order(), &style);
        assert_eq!(doc.width, 384);
        assert_eq!(doc.texts()[0], "Kaktus Cafe");
    }
}
