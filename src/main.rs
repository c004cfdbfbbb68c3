//! # Kitchen Print CLI
//!
//! ## Usage
//!
//! ```bash
//! # Run the print queue service next to the order service
//! kitchen-print queue-server --listen 0.0.0.0:3000
//!
//! # Run the print agent for one restaurant
//! RESTAURANT_ID=kaktus PRINTER_IP=192.168.1.100 kitchen-print agent
//!
//! # Preview a receipt as PNG
//! kitchen-print render order.json --png receipt.png
//!
//! # Print one order directly
//! kitchen-print print order.json --printer-ip 192.168.1.100
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kitchen_print::{
    PrintError, agent,
    config::{AgentArgs, PrinterArgs, QueueServerArgs},
    order::Order,
    protocol::build_print_job,
    receipt::render_receipt,
    server,
    transport::PrinterTransport,
};

/// Kitchen Print - cafeteria kitchen receipt printing
#[derive(Parser, Debug)]
#[command(name = "kitchen-print")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the print queue HTTP service
    QueueServer(QueueServerArgs),

    /// Run the print agent: poll the queue and print new orders
    Agent(AgentArgs),

    /// Render an order JSON file to a PNG preview
    Render {
        /// Order JSON file
        order: PathBuf,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        #[command(flatten)]
        printer: PrinterArgs,
    },

    /// Print an order JSON file directly, bypassing the queue
    Print {
        /// Order JSON file
        order: PathBuf,

        #[command(flatten)]
        printer: PrinterArgs,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchen_print=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PrintError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::QueueServer(args) => server::serve(args.into()).await,
        Commands::Agent(args) => agent::run(args.into_config()?).await,
        Commands::Render { order, png, printer } => {
            let order = read_order(&order)?;
            let settings = printer.into_settings()?;
            let rasterizer = settings.rasterizer(Arc::new(settings.load_fonts()?));

            let raster = rasterizer.rasterize(render_receipt(&order, &settings.style)).await?;
            raster.to_png(&png)?;
            println!(
                "Saved {}x{} receipt to {}",
                raster.width,
                raster.height,
                png.display()
            );
            Ok(())
        }
        Commands::Print { order, printer } => {
            let order = read_order(&order)?;
            let settings = printer.into_settings()?;
            let rasterizer = settings.rasterizer(Arc::new(settings.load_fonts()?));
            let transport = settings.transport();

            let raster = rasterizer.rasterize(render_receipt(&order, &settings.style)).await?;
            transport
                .send(&build_print_job(&raster, &settings.printer))
                .await?;
            info!(order_id = %order.id, printer = %transport.address(), "Order printed");
            println!("Printed successfully!");
            Ok(())
        }
    }
}

/// Read an order from a JSON file. Accepts either a bare order or
/// `{"order": {...}}` as posted to the agent.
fn read_order(path: &Path) -> Result<Order, PrintError> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| PrintError::Config(format!("{}: {}", path.display(), e)))?;
    let order = match value.get("order") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => value,
    };
    serde_json::from_value(order)
        .map_err(|e| PrintError::Config(format!("{}: {}", path.display(), e)))
}
