//! Agent counters reported by `GET /health`.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// An order that keeps failing to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StuckOrder {
    pub id: String,
    pub attempts: u32,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub printer: String,
    pub restaurant_id: String,
    pub last_poll_at: Option<DateTime<Utc>>,
    pub printed: u64,
    pub failed: u64,
    pub stuck_orders: Vec<StuckOrder>,
}

#[derive(Debug, Default)]
struct Counters {
    last_poll_at: Option<DateTime<Utc>>,
    printed: u64,
    failed: u64,
    stuck: BTreeMap<String, u32>,
}

/// Shared between the poll loop and the HTTP surface.
#[derive(Debug)]
pub struct AgentStatus {
    started: Instant,
    restaurant_id: String,
    printer: String,
    counters: RwLock<Counters>,
}

impl AgentStatus {
    pub fn new(restaurant_id: impl Into<String>, printer: impl Into<String>) -> Self {
        Self {
            started: Instant::now(),
            restaurant_id: restaurant_id.into(),
            printer: printer.into(),
            counters: RwLock::new(Counters::default()),
        }
    }

    pub async fn record_printed(&self) {
        self.counters.write().await.printed += 1;
    }

    pub async fn record_failed(&self) {
        self.counters.write().await.failed += 1;
    }

    /// Mark the end of a poll cycle and replace the stuck-order set.
    pub async fn finish_cycle(&self, stuck: BTreeMap<String, u32>) {
        let mut counters = self.counters.write().await;
        counters.last_poll_at = Some(Utc::now());
        counters.stuck = stuck;
    }

    pub async fn report(&self) -> HealthReport {
        let counters = self.counters.read().await;
        HealthReport {
            status: "ok",
            uptime_secs: self.started.elapsed().as_secs(),
            printer: self.printer.clone(),
            restaurant_id: self.restaurant_id.clone(),
            last_poll_at: counters.last_poll_at,
            printed: counters.printed,
            failed: counters.failed,
            stuck_orders: counters
                .stuck
                .iter()
                .map(|(id, &attempts)| StuckOrder {
                    id: id.clone(),
                    attempts,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_counts() {
        let status = AgentStatus::new("kaktus", "192.168.1.100:9100");
        status.record_printed().await;
        status.record_printed().await;
        status.record_failed().await;

        let report = status.report().await;
        assert_eq!(report.printed, 2);
        assert_eq!(report.failed, 1);
        assert!(report.last_poll_at.is_none());
        assert!(report.stuck_orders.is_empty());
    }

    #[tokio::test]
    async fn test_report_json_shape() {
        let status = AgentStatus::new("kaktus", "10.0.0.5:9100");
        status
            .finish_cycle(BTreeMap::from([("ORD-1".to_string(), 12)]))
            .await;

        let json = serde_json::to_value(status.report().await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["restaurantId"], "kaktus");
        assert_eq!(json["printer"], "10.0.0.5:9100");
        assert!(json["lastPollAt"].is_string());
        assert_eq!(json["stuckOrders"][0]["id"], "ORD-1");
        assert_eq!(json["stuckOrders"][0]["attempts"], 12);
        assert!(json["uptimeSecs"].is_u64());
    }
}
