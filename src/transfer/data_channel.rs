//! Module `data_channel`
//!
//! Opens active-mode data connections: the server connects out to the
//! endpoint the client announced with PORT.

use log::{info, warn};
use std::net::SocketAddrV4;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::TransferError;

/// Connects to the client's data endpoint, giving up after `connect_timeout`.
pub async fn open_active(
    endpoint: SocketAddrV4,
    connect_timeout: Duration,
) -> Result<TcpStream, TransferError> {
    match timeout(connect_timeout, TcpStream::connect(endpoint)).await {
        Ok(Ok(stream)) => {
            info!("Data connection established with {}", endpoint);
            Ok(stream)
        }
        Ok(Err(e)) => {
            warn!("Failed to connect to data endpoint {}: {}", endpoint, e);
            Err(TransferError::Connect(endpoint, e))
        }
        Err(_) => {
            warn!(
                "Timed out after {:?} connecting to data endpoint {}",
                connect_timeout, endpoint
            );
            Err(TransferError::ConnectTimeout(endpoint))
        }
    }
}
