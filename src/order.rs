//! # Order Snapshots
//!
//! The order shape the print queue stores and the print agent consumes.
//! JSON field names are camelCase, matching the order service.
//!
//! Deserialization is deliberately forgiving: every field has a default,
//! `kitchenNumber` may be a string or a number, and item quantities may be
//! numbers or numeric strings. A half-filled order still renders; the queue
//! layer decides separately whether an order is acceptable for enqueue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Display name, may be right-to-left script
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    /// Quantity ordered
    #[serde(default = "default_qty", deserialize_with = "lenient_qty")]
    pub qty: u32,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, qty: u32) -> Self {
        Self {
            name: name.into(),
            qty,
        }
    }
}

fn default_qty() -> u32 {
    1
}

/// Immutable order snapshot taken when the order was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Human-readable order code, e.g. `ORD-2025-483920`
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Short code called out at the pickup counter
    #[serde(default, deserialize_with = "string_or_number")]
    pub kitchen_number: String,
    /// Restaurant whose queue and printer this order belongs to
    #[serde(default, deserialize_with = "string_or_number")]
    pub restaurant_id: String,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<OrderItem>,
    /// Pre-formatted display date
    #[serde(default, deserialize_with = "string_or_number")]
    pub date: String,
    /// Pre-formatted display time
    #[serde(default, deserialize_with = "string_or_number")]
    pub time: String,
}

/// An order waiting in the print queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    #[serde(flatten)]
    pub order: Order,
    /// When the entry was appended. Informational only.
    pub added_to_queue_at: DateTime<Utc>,
}

impl QueueEntry {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            added_to_queue_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.order.id
    }
}

/// Accept a JSON string, number, bool or null and keep it as display text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_qty<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let qty = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(qty
        .map(|q| q.min(u32::MAX as u64) as u32)
        .unwrap_or_else(default_qty))
}

/// Accept anything for `items`. A non-array is no items; inside the array a
/// bare string is an item name with quantity 1 and other non-objects are
/// dropped.
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let serde_json::Value::Array(values) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
            serde_json::Value::String(name) => Some(OrderItem::new(name, 1)),
            _ => None,
        })
        .collect())
}
