//! Deskline - a command-line client for the service-ticket API.
//!
//! Authenticates against the ticket backend, stores the session locally,
//! and exposes ticket lookup/creation plus the supervisor and admin
//! management commands.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deskline::app::{self, App};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Deskline starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        app::print_usage();
        return Ok(());
    }

    let mut app = App::new()?;
    if let Err(e) = app.run(&args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
