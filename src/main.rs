//! Story submission relay.
//!
//! Receives public form posts, cleans and screens them, and forwards
//! accepted stories to the automation hook.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                    STORY RELAY                        │
//!                        │                                                       │
//!   Form POST            │  ┌────────┐   ┌──────────┐   ┌──────────┐             │
//!   ─────────────────────┼─▶│  gate  │──▶│ extract  │──▶│ sanitize │             │
//!                        │  │ (POST) │   │ (aliases)│   │          │             │
//!                        │  └────────┘   └──────────┘   └────┬─────┘             │
//!                        │                                    ▼                  │
//!                        │                ┌──────────┐   ┌──────────┐            │
//!                        │                │   slug   │◀──│ validate │──▶ 400     │
//!                        │                └────┬─────┘   └──────────┘            │
//!                        │                     ▼                                 │
//!   JSON response        │  ┌──────────┐   ┌──────────┐   ┌──────────┐          │
//!   ◀────────────────────┼──│ response │◀──│  relay   │──▶│ message  │──────────┼──▶ Hook
//!                        │  │  mapper  │   │  client  │   │ builder  │          │
//!                        │  └──────────┘   └──────────┘   └──────────┘          │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use story_relay::config::load_config;
use story_relay::http::HttpServer;
use story_relay::lifecycle::{signals, Shutdown};
use story_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "story-relay")]
#[command(about = "Sanitizing relay between the story form and the automation hook", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("story-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        downstream_configured = config.downstream.url.is_some(),
        downstream_timeout_secs = config.downstream.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
