//! Transfer module for FTP server
//!
//! Coordinates active-mode transfers: opens the data connection toward the
//! endpoint announced with PORT and runs the one-directional copy.

pub mod data_channel;
pub mod file_ops;
pub mod modes;

use log::info;
use std::net::SocketAddrV4;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::TransferError;
use crate::protocol::responses;
use crate::server::ServerConfig;

pub use data_channel::open_active;
pub use file_ops::{receive_file, send_file};
pub use modes::TransferMode;

/// Which way the bytes flow for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// STOR: client to server.
    Upload,
    /// RETR: server to client.
    Download,
}

impl Direction {
    pub fn success_reply(&self) -> &'static str {
        match self {
            Direction::Upload => responses::STOR_OK,
            Direction::Download => responses::RETR_OK,
        }
    }
}

/// A transfer whose preconditions have all passed: the endpoint was taken
/// from the session and the path was resolved inside the jail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    pub direction: Direction,
    pub path: PathBuf,
    pub endpoint: SocketAddrV4,
}

/// Limits applied to every data transfer.
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub buffer_size: usize,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_file_size: u64,
}

impl From<&ServerConfig> for TransferSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            buffer_size: config.buffer_size,
            connect_timeout: config.connect_timeout(),
            idle_timeout: config.idle_timeout(),
            max_file_size: config.max_file_size_bytes(),
        }
    }
}

/// Runs `job` to completion and returns the number of bytes copied.
///
/// The data connection lives only inside this call and is closed on every
/// return path.
pub async fn run_transfer(
    job: &TransferJob,
    settings: &TransferSettings,
) -> Result<u64, TransferError> {
    let mut stream = open_active(job.endpoint, settings.connect_timeout).await?;

    let result = match job.direction {
        Direction::Upload => receive_file(&mut stream, &job.path, settings).await,
        Direction::Download => send_file(&mut stream, &job.path, settings).await,
    };

    drop(stream);
    info!("Data connection to {} closed", job.endpoint);
    result
}
