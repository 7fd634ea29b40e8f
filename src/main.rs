//! nbgate binary.
//!
//! ```text
//! nbgate -u username -p password [--http :80] [--bind :443 --tls-cert cert.pem --tls-key key.pem]
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;

use nbgate::config::{cli::Cli, loader::load_config, ProxyConfig};
use nbgate::lifecycle::{signals, startup, Shutdown};
use nbgate::observability::{logging, metrics};
use nbgate::Upstream;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);

    if config.credentials.username.is_empty() || config.credentials.password.is_empty() {
        println!("Usage: nbgate -u username -p password");
        return ExitCode::FAILURE;
    }

    logging::init(&config.observability);
    tracing::info!("nbgate v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    match startup::start(config, Upstream::default(), &shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
