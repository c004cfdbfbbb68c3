//! # Print Pipeline
//!
//! One order, start to finish:
//!
//! ```text
//! Order ──render_receipt──► Document ──rasterize──► RawRaster
//!       ──build_print_job──► ESC/POS bytes ──transport──► printer
//! ```
//!
//! The whole pipeline runs under one async mutex, so the poll loop and a
//! manual `POST /print-order` never talk to the printer at the same time.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::PrintError;
use crate::order::Order;
use crate::printer::PrinterConfig;
use crate::protocol::build_print_job;
use crate::receipt::{ReceiptStyle, render_receipt};
use crate::render::Rasterizer;
use crate::transport::PrinterTransport;

pub struct PrintPipeline {
    style: ReceiptStyle,
    rasterizer: Rasterizer,
    printer: PrinterConfig,
    transport: Arc<dyn PrinterTransport>,
    lock: Mutex<()>,
}

impl PrintPipeline {
    pub fn new(
        style: ReceiptStyle,
        rasterizer: Rasterizer,
        printer: PrinterConfig,
        transport: Arc<dyn PrinterTransport>,
    ) -> Self {
        Self {
            style,
            rasterizer,
            printer,
            transport,
            lock: Mutex::new(()),
        }
    }

    pub fn printer_address(&self) -> String {
        self.transport.address()
    }

    /// Render and send one order. Nothing is retried here.
    #[instrument(skip_all, fields(order_id = %order.id))]
    pub async fn print(&self, order: &Order) -> Result<(), PrintError> {
        let _guard = self.lock.lock().await;

        let doc = render_receipt(order, &self.style);
        let raster = self.rasterizer.rasterize(doc).await?;
        let job = build_print_job(&raster, &self.printer);
        debug!(
            width = raster.width,
            height = raster.height,
            bytes = job.len(),
            "Print job built"
        );

        self.transport.send(&job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FontSet;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Recorder {
        jobs: StdMutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl PrinterTransport for Recorder {
        async fn send(&self, data: &[u8]) -> Result<(), PrintError> {
            self.jobs.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        fn address(&self) -> String {
            "recorder".into()
        }
    }

    fn pipeline(transport: Arc<dyn PrinterTransport>) -> PrintPipeline {
        let fonts = Arc::new(FontSet::builtin().unwrap());
        PrintPipeline::new(
            ReceiptStyle::default(),
            Rasterizer::new(fonts, 570),
            PrinterConfig::default(),
            transport,
        )
    }

    #[tokio::test]
    async fn test_print_sends_one_framed_job() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = pipeline(recorder.clone());

        pipeline.print(&Order::default()).await.unwrap();

        let jobs = recorder.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        // ESC @ first, GS V 66 0 last
        assert_eq!(&job[..2], &[0x1B, b'@']);
        assert_eq!(&job[job.len() - 4..], &[0x1D, b'V', 66, 0]);
        // Raster header carries 72 bytes per row
        let pos = job.windows(4).position(|w| w == [0x1D, b'v', b'0', 0]).unwrap();
        assert_eq!(&job[pos + 4..pos + 6], &[72, 0]);
    }

    #[tokio::test]
    async fn test_printer_address() {
        let pipeline = pipeline(Arc::new(Recorder::default()));
        assert_eq!(pipeline.printer_address(), "recorder");
    }
}
