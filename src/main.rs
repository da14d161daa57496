//! Identity Contracts MCP Server
//!
//! Serves the contract operations over MCP on stdio.

use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use identity_contracts::{Config, IdentityContractsServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // stdout carries the MCP transport
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(
        infura = !config.infura_id.is_empty(),
        faucet_enabled = config.faucet.enabled,
        auto_invest_enabled = config.auto_invest.enabled,
        "Starting Identity Contracts MCP Server"
    );

    let server = IdentityContractsServer::new(config)?;

    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await?;

    running.waiting().await?;

    Ok(())
}
