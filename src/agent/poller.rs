//! # Queue Poller
//!
//! Drains one restaurant's print queue, at least once per order:
//!
//! ```text
//!            fetch ok                 print ok            remove ok
//! queued ──────────────► printing ──────────────► printed ──────────► gone
//!    ▲                      │                        │
//!    └──── print failed ────┘       remove failed ───┘ (may print again)
//! ```
//!
//! An order leaves the queue only after the printer accepted its bytes.
//! Failed orders stay queued and are retried on every cycle; there is no
//! terminal failure state. Consecutive failures are counted per order and
//! reported as *stuck* every `stuck_threshold` attempts.
//!
//! Cycles never overlap: the next one starts `interval` after the previous
//! one finished.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::client::QueueClient;
use super::pipeline::PrintPipeline;
use super::status::AgentStatus;

/// Default pause between cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of failed attempts before an order is reported stuck.
pub const DEFAULT_STUCK_THRESHOLD: u32 = 10;

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Orders returned by the queue
    pub fetched: usize,
    /// Orders the printer accepted
    pub printed: usize,
    /// Orders left queued after a render or transport failure
    pub failed: usize,
    /// Printed orders whose removal failed
    pub remove_failed: usize,
    /// The queue could not be read at all
    pub fetch_failed: bool,
}

pub struct Poller {
    client: Arc<dyn QueueClient>,
    pipeline: Arc<PrintPipeline>,
    status: Arc<AgentStatus>,
    restaurant_id: String,
    interval: Duration,
    stuck_threshold: u32,
    attempts: HashMap<String, u32>,
}

impl Poller {
    pub fn new(
        client: Arc<dyn QueueClient>,
        pipeline: Arc<PrintPipeline>,
        status: Arc<AgentStatus>,
        restaurant_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            pipeline,
            status,
            restaurant_id: restaurant_id.into(),
            interval: DEFAULT_POLL_INTERVAL,
            stuck_threshold: DEFAULT_STUCK_THRESHOLD,
            attempts: HashMap::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// `0` disables the stuck-order warning.
    pub fn with_stuck_threshold(mut self, threshold: u32) -> Self {
        self.stuck_threshold = threshold;
        self
    }

    /// Consecutive failed attempts for an order still in the queue.
    pub fn attempts(&self, order_id: &str) -> u32 {
        self.attempts.get(order_id).copied().unwrap_or(0)
    }

    /// Poll forever.
    pub async fn run(mut self) {
        info!(
            restaurant_id = %self.restaurant_id,
            printer = %self.pipeline.printer_address(),
            interval_ms = self.interval.as_millis() as u64,
            "Print queue poller started"
        );
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Fetch the queue once and try every returned order, in order.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let restaurant_id = self.restaurant_id.as_str();

        let orders = match self.client.fetch(restaurant_id).await {
            Ok(orders) => orders,
            Err(e) => {
                error!(restaurant_id, error = %e, "Failed to fetch print queue");
                report.fetch_failed = true;
                self.status.finish_cycle(self.stuck_orders()).await;
                return report;
            }
        };
        report.fetched = orders.len();
        if !orders.is_empty() {
            debug!(restaurant_id, count = orders.len(), "Orders waiting");
        }

        // Orders removed elsewhere no longer count as stuck.
        self.attempts
            .retain(|id, _| orders.iter().any(|o| &o.id == id));

        for order in &orders {
            let order_id = order.id.as_str();
            match self.pipeline.print(order).await {
                Ok(()) => {
                    report.printed += 1;
                    self.attempts.remove(order_id);
                    self.status.record_printed().await;
                    info!(order_id, restaurant_id, "Order printed");

                    match self.client.remove(order_id).await {
                        Ok(()) => info!(order_id, "Order removed from print queue"),
                        Err(e) => {
                            report.remove_failed += 1;
                            warn!(
                                order_id,
                                error = %e,
                                "Printed order could not be removed from the queue and may print again"
                            );
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    self.status.record_failed().await;
                    let attempts = self.attempts.entry(order.id.clone()).or_insert(0);
                    *attempts += 1;
                    let attempts = *attempts;
                    warn!(order_id, attempts, error = %e, "Print failed, order stays queued");

                    if self.stuck_threshold > 0 && attempts % self.stuck_threshold == 0 {
                        warn!(
                            order_id,
                            restaurant_id,
                            attempts,
                            "Order is stuck in the print queue"
                        );
                    }
                }
            }
        }

        self.status.finish_cycle(self.stuck_orders()).await;
        debug!(?report, "Poll cycle finished");
        report
    }

    fn stuck_orders(&self) -> BTreeMap<String, u32> {
        if self.stuck_threshold == 0 {
            return BTreeMap::new();
        }
        self.attempts
            .iter()
            .filter(|&(_, &n)| n >= self.stuck_threshold)
            .map(|(id, &n)| (id.clone(), n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrintError;
    use crate::order::Order;
    use crate::printer::PrinterConfig;
    use crate::receipt::ReceiptStyle;
    use crate::render::{FontSet, Rasterizer};
    use crate::transport::PrinterTransport;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory queue that records removals.
    #[derive(Default)]
    struct FakeQueue {
        orders: Mutex<Vec<Order>>,
        fetch_fails: AtomicBool,
        remove_fails: AtomicBool,
    }

    impl FakeQueue {
        fn with(ids: &[&str]) -> Self {
            let orders = ids
                .iter()
                .map(|id| Order {
                    id: id.to_string(),
                    restaurant_id: "kaktus".into(),
                    ..Default::default()
                })
                .collect();
            Self {
                orders: Mutex::new(orders),
                ..Default::default()
            }
        }

        fn ids(&self) -> Vec<String> {
            self.orders.lock().unwrap().iter().map(|o| o.id.clone()).collect()
        }
    }

    #[async_trait]
    impl QueueClient for FakeQueue {
        async fn fetch(&self, restaurant_id: &str) -> Result<Vec<Order>, PrintError> {
            if self.fetch_fails.load(Ordering::SeqCst) {
                return Err(PrintError::QueueService("unreachable".into()));
            }
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .filter(|o| o.restaurant_id == restaurant_id)
                .cloned()
                .collect())
        }

        async fn remove(&self, order_id: &str) -> Result<(), PrintError> {
            if self.remove_fails.load(Ordering::SeqCst) {
                return Err(PrintError::QueueService("500".into()));
            }
            let mut orders = self.orders.lock().unwrap();
            let pos = orders
                .iter()
                .position(|o| o.id == order_id)
                .ok_or_else(|| PrintError::QueueService("404".into()))?;
            orders.remove(pos);
            Ok(())
        }
    }

    /// Printer that can be switched off, failing every job while off.
    #[derive(Default)]
    struct FakePrinter {
        offline: AtomicBool,
        jobs: AtomicUsize,
    }

    #[async_trait]
    impl PrinterTransport for FakePrinter {
        async fn send(&self, _data: &[u8]) -> Result<(), PrintError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(PrintError::Connection("printer offline".into()));
            }
            self.jobs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn address(&self) -> String {
            "fake:9100".into()
        }
    }

    fn poller(queue: Arc<FakeQueue>, printer: Arc<FakePrinter>) -> (Poller, Arc<AgentStatus>) {
        let fonts = Arc::new(FontSet::builtin().unwrap());
        let pipeline = Arc::new(PrintPipeline::new(
            ReceiptStyle::default(),
            Rasterizer::new(fonts, 570),
            PrinterConfig::default(),
            printer,
        ));
        let status = Arc::new(AgentStatus::new("kaktus", "fake:9100"));
        let poller = Poller::new(queue, pipeline, status.clone(), "kaktus")
            .with_interval(Duration::ZERO)
            .with_stuck_threshold(3);
        (poller, status)
    }

    #[tokio::test]
    async fn test_prints_and_removes_in_order() {
        let queue = Arc::new(FakeQueue::with(&["A", "B"]));
        let printer = Arc::new(FakePrinter::default());
        let (mut poller, status) = poller(queue.clone(), printer.clone());

        let report = poller.run_cycle().await;

        assert_eq!(
            report,
            CycleReport {
                fetched: 2,
                printed: 2,
                ..Default::default()
            }
        );
        assert!(queue.ids().is_empty());
        assert_eq!(printer.jobs.load(Ordering::SeqCst), 2);
        assert_eq!(status.report().await.printed, 2);
    }

    #[tokio::test]
    async fn test_empty_queue() {
        let queue = Arc::new(FakeQueue::default());
        let (mut poller, status) = poller(queue, Arc::new(FakePrinter::default()));

        let report = poller.run_cycle().await;
        assert_eq!(report, CycleReport::default());
        assert!(status.report().await.last_poll_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let queue = Arc::new(FakeQueue::with(&["A"]));
        queue.fetch_fails.store(true, Ordering::SeqCst);
        let printer = Arc::new(FakePrinter::default());
        let (mut poller, _) = poller(queue.clone(), printer.clone());

        let report = poller.run_cycle().await;
        assert!(report.fetch_failed);
        assert_eq!(printer.jobs.load(Ordering::SeqCst), 0);
        assert_eq!(queue.ids(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_failed_print_stays_queued_and_retries() {
        let queue = Arc::new(FakeQueue::with(&["A"]));
        let printer = Arc::new(FakePrinter::default());
        printer.offline.store(true, Ordering::SeqCst);
        let (mut poller, _) = poller(queue.clone(), printer.clone());

        let report = poller.run_cycle().await;
        assert_eq!(report.failed, 1);
        assert_eq!(queue.ids(), vec!["A"]);
        assert_eq!(poller.attempts("A"), 1);

        printer.offline.store(false, Ordering::SeqCst);
        let report = poller.run_cycle().await;
        assert_eq!(report.printed, 1);
        assert!(queue.ids().is_empty());
        assert_eq!(poller.attempts("A"), 0);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_the_rest() {
        let queue = Arc::new(FakeQueue::with(&["A", "B"]));
        queue.remove_fails.store(true, Ordering::SeqCst);
        let printer = Arc::new(FakePrinter::default());
        let (mut poller, _) = poller(queue.clone(), printer.clone());

        let report = poller.run_cycle().await;
        assert_eq!(report.printed, 2);
        assert_eq!(report.remove_failed, 2);
        // Still queued: next cycle prints them again
        assert_eq!(queue.ids(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_stuck_orders_reported() {
        let queue = Arc::new(FakeQueue::with(&["A"]));
        let printer = Arc::new(FakePrinter::default());
        printer.offline.store(true, Ordering::SeqCst);
        let (mut poller, status) = poller(queue.clone(), printer);

        for _ in 0..2 {
            poller.run_cycle().await;
        }
        assert!(status.report().await.stuck_orders.is_empty());

        poller.run_cycle().await;
        let stuck = status.report().await.stuck_orders;
        assert_eq!(stuck.len(), 1);
        assert_eq!(stuck[0].id, "A");
        assert_eq!(stuck[0].attempts, 3);
    }

    #[tokio::test]
    async fn test_attempts_forgotten_when_order_leaves_queue() {
        let queue = Arc::new(FakeQueue::with(&["A"]));
        let printer = Arc::new(FakePrinter::default());
        printer.offline.store(true, Ordering::SeqCst);
        let (mut poller, _) = poller(queue.clone(), printer);

        poller.run_cycle().await;
        assert_eq!(poller.attempts("A"), 1);

        queue.orders.lock().unwrap().clear();
        poller.run_cycle().await;
        assert_eq!(poller.attempts("A"), 0);
    }
}
