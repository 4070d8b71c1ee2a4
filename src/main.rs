//! tiny-ftp-server - Entry Point
//!
//! A small FTP server implementing the active-mode subset of RFC 959.

use anyhow::Context;
use log::info;

use tiny_ftp_server::utils::setup_logging;
use tiny_ftp_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    info!("Launching FTP server...");

    let config = ServerConfig::load().context("failed to load configuration")?;
    let server = Server::bind(config)
        .await
        .context("server startup failed")?;
    server.start().await;

    Ok(())
}
