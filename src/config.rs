//! # Configuration
//!
//! Every option is a command-line flag with an environment fallback, so the
//! agent can be configured entirely from a `.env`-style deployment:
//!
//! | Flag | Environment | Default |
//! |------|-------------|---------|
//! | `--printer-ip` | `PRINTER_IP` | `192.168.1.100` |
//! | `--printer-port` | `PRINTER_PORT` | `9100` |
//! | `--printer-width` | `PRINTER_WIDTH` | `570` |
//! | `--font` | `FONT_PATH` | embedded DejaVu Sans |
//! | `--font-bold` | `FONT_BOLD_PATH` | synthesized |
//! | `--bitmap-font` | `BITMAP_FONT` | `false` |
//! | `--brand` | `BRAND_NAME` | `UniFood` |
//! | `--raster-timeout-ms` | `RASTER_TIMEOUT_MS` | `10000` |
//! | `--printer-timeout-ms` | `PRINTER_TIMEOUT_MS` | `5000` |
//! | `--restaurant-id` | `RESTAURANT_ID` | required |
//! | `--main-server-url` | `MAIN_SERVER_URL` | `http://localhost:3000` |
//! | `--poll-interval-ms` | `POLL_INTERVAL_MS` | `2000` |
//! | `--port` | `PORT` | `3001` |
//! | `--stuck-threshold` | `STUCK_THRESHOLD` | `10` |
//! | `--queue-file` | `QUEUE_FILE` | `data/print-queue.json` |
//! | `--listen` | `LISTEN_ADDR` | `0.0.0.0:3000` |
//!
//! The parsed arguments are validated into plain structs
//! ([`AgentConfig`], [`ServerConfig`]) that are handed to constructors.
//! Nothing reads the environment after start-up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use reqwest::Url;
use tracing::warn;

use crate::error::PrintError;
use crate::printer::PrinterConfig;
use crate::receipt::ReceiptStyle;
use crate::render::shaping::shape;
use crate::render::{FontSet, Rasterizer};
use crate::server::ServerConfig;
use crate::transport::NetworkTransport;

/// Printer, font and receipt options shared by `agent` and `print`.
#[derive(Args, Debug, Clone)]
pub struct PrinterArgs {
    /// Printer IP address or host name
    #[arg(long, env = "PRINTER_IP", default_value = "192.168.1.100")]
    pub printer_ip: String,

    /// Printer raw TCP port
    #[arg(long, env = "PRINTER_PORT", default_value_t = 9100)]
    pub printer_port: u16,

    /// Print width in dots
    #[arg(long, env = "PRINTER_WIDTH", default_value_t = 570)]
    pub printer_width: u16,

    /// TrueType font for receipt text (embedded DejaVu Sans if unset)
    #[arg(long = "font", env = "FONT_PATH", value_name = "FILE")]
    pub font_path: Option<PathBuf>,

    /// Bold companion of --font
    #[arg(long = "font-bold", env = "FONT_BOLD_PATH", value_name = "FILE")]
    pub font_bold_path: Option<PathBuf>,

    /// Draw with the built-in Spleen bitmap face (Latin only)
    #[arg(long, env = "BITMAP_FONT", conflicts_with = "font_path")]
    pub bitmap_font: bool,

    /// Brand name printed at the top of each receipt
    #[arg(long = "brand", env = "BRAND_NAME", default_value = "UniFood")]
    pub brand_name: String,

    /// Upper bound on rendering one receipt
    #[arg(long, env = "RASTER_TIMEOUT_MS", default_value_t = 10_000)]
    pub raster_timeout_ms: u64,

    /// Printer connect timeout
    #[arg(long, env = "PRINTER_TIMEOUT_MS", default_value_t = 5_000)]
    pub printer_timeout_ms: u64,
}

/// Validated printer-side settings.
#[derive(Debug, Clone)]
pub struct PrinterSettings {
    pub host: String,
    pub port: u16,
    pub printer: PrinterConfig,
    pub font_path: Option<PathBuf>,
    pub font_bold_path: Option<PathBuf>,
    pub bitmap_font: bool,
    pub style: ReceiptStyle,
    pub raster_timeout: Duration,
    pub connect_timeout: Duration,
}

impl PrinterArgs {
    pub fn into_settings(self) -> Result<PrinterSettings, PrintError> {
        if self.printer_ip.trim().is_empty() {
            return Err(PrintError::Config("PRINTER_IP must not be empty".into()));
        }
        if self.printer_width < 8 {
            return Err(PrintError::Config(format!(
                "PRINTER_WIDTH must be at least 8 dots, got {}",
                self.printer_width
            )));
        }
        if self.font_bold_path.is_some() && self.font_path.is_none() {
            return Err(PrintError::Config(
                "FONT_BOLD_PATH requires FONT_PATH".into(),
            ));
        }

        let printer = PrinterConfig::with_width(self.printer_width);
        Ok(PrinterSettings {
            host: self.printer_ip.trim().to_string(),
            port: self.printer_port,
            style: ReceiptStyle {
                brand: self.brand_name,
                width: printer.width_dots as usize,
                ..Default::default()
            },
            printer,
            font_path: self.font_path,
            font_bold_path: self.font_bold_path,
            bitmap_font: self.bitmap_font,
            raster_timeout: Duration::from_millis(self.raster_timeout_ms),
            connect_timeout: Duration::from_millis(self.printer_timeout_ms),
        })
    }
}

impl PrinterSettings {
    pub fn load_fonts(&self) -> Result<FontSet, PrintError> {
        let fonts = if self.bitmap_font {
            FontSet::builtin()?
        } else {
            FontSet::load(self.font_path.as_deref(), self.font_bold_path.as_deref())?
        };

        let missing = fonts.missing_glyphs(&shape(&self.style.labels.texts().join(" ")));
        if !missing.is_empty() {
            warn!(
                missing = %missing.iter().collect::<String>(),
                "Receipt font lacks glyphs for the receipt labels, they will print as boxes"
            );
        }
        Ok(fonts)
    }

    pub fn rasterizer(&self, fonts: Arc<FontSet>) -> Rasterizer {
        Rasterizer::new(fonts, self.printer.width_dots as usize).with_timeout(self.raster_timeout)
    }

    pub fn transport(&self) -> NetworkTransport {
        NetworkTransport::new(self.host.clone(), self.port).with_timeout(self.connect_timeout)
    }
}

/// Options of the `agent` command.
#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    #[command(flatten)]
    pub printer: PrinterArgs,

    /// Restaurant whose queue this agent drains
    #[arg(long, env = "RESTAURANT_ID")]
    pub restaurant_id: String,

    /// Base URL of the order service hosting the print queue
    #[arg(long, env = "MAIN_SERVER_URL", default_value = "http://localhost:3000")]
    pub main_server_url: String,

    /// Pause between poll cycles
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2_000)]
    pub poll_interval_ms: u64,

    /// Port of the agent's own HTTP surface
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Failed attempts after which an order is reported as stuck
    #[arg(long, env = "STUCK_THRESHOLD", default_value_t = 10)]
    pub stuck_threshold: u32,
}

/// Everything the print agent needs, validated.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub restaurant_id: String,
    pub main_server_url: Url,
    pub poll_interval: Duration,
    pub http_port: u16,
    /// `0` disables the stuck-order warning
    pub stuck_threshold: u32,
    pub printer: PrinterSettings,
}

impl AgentArgs {
    pub fn into_config(self) -> Result<AgentConfig, PrintError> {
        let restaurant_id = self.restaurant_id.trim().to_string();
        if restaurant_id.is_empty() {
            return Err(PrintError::Config("RESTAURANT_ID must not be empty".into()));
        }

        let main_server_url = Url::parse(&self.main_server_url).map_err(|e| {
            PrintError::Config(format!("MAIN_SERVER_URL {:?}: {}", self.main_server_url, e))
        })?;
        if main_server_url.cannot_be_a_base() {
            return Err(PrintError::Config(format!(
                "MAIN_SERVER_URL {:?} is not a base URL",
                self.main_server_url
            )));
        }

        Ok(AgentConfig {
            restaurant_id,
            main_server_url,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            http_port: self.port,
            stuck_threshold: self.stuck_threshold,
            printer: self.printer.into_settings()?,
        })
    }
}

/// Options of the `queue-server` command.
#[derive(Args, Debug, Clone)]
pub struct QueueServerArgs {
    /// Address to listen on
    #[arg(long = "listen", env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: String,

    /// JSON file holding the queue
    #[arg(long, env = "QUEUE_FILE", default_value = "data/print-queue.json")]
    pub queue_file: PathBuf,
}

impl From<QueueServerArgs> for ServerConfig {
    fn from(args: QueueServerArgs) -> Self {
        ServerConfig {
            queue_file: args.queue_file,
            listen_addr: args.listen_addr,
        }
    }
}
