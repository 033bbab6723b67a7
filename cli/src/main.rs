//! Cleaning booking service, headless CLI server
//!
//! ```sh
//! # Run with default config (~/.config/cleaning-booking/config.toml)
//! booking-service
//!
//! # Custom config path
//! booking-service --config /etc/cleaning-booking/config.toml
//!
//! # Validate config without starting
//! booking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use cleaning_booking::config::{AppConfig, CONFIG_ENV};
use cleaning_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Booking engine for a residential cleaning service.
#[derive(Parser, Debug)]
#[command(
    name = "booking-service",
    version,
    about = "Cleaning service booking engine",
    long_about = "REST API that prices cleaning carts, applies promo codes, \
                  subscriptions and gift cards, and records bookings.\n\n\
                  Default config: ~/.config/cleaning-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(cleaning_booking::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            // Tracing is not initialized yet
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ───────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        println!("   Tax rate    : {}", config.booking.sales_tax_rate);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());
    run(config, &cli).await
}

async fn run(config: AppConfig, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
