//! Error types
//!
//! Defines domain-specific error types for each module of the FTP server.

use std::io;
use std::net::SocketAddrV4;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::protocol::responses;

/// Errors raised while reconstructing command lines from the control channel.
#[derive(Debug, Error)]
pub enum FramerError {
    #[error("connection closed by peer")]
    ConnectionClosed,

    #[error("command line exceeds {0} bytes")]
    LineTooLong(usize),

    #[error("control channel read failed: {0}")]
    Io(#[from] io::Error),
}

/// Path resolution and jail errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("path escapes server root: {0}")]
    OutsideRoot(PathBuf),

    #[error("no such file or directory: {0}")]
    NotFound(PathBuf),

    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Data channel and file copy errors.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to connect to {0}: {1}")]
    Connect(SocketAddrV4, io::Error),

    #[error("timed out connecting to {0}")]
    ConnectTimeout(SocketAddrV4),

    #[error("data channel failed: {0}")]
    DataChannel(io::Error),

    #[error("data channel idle for more than {0:?}")]
    IdleTimeout(Duration),

    #[error("local file error: {0}")]
    LocalFile(io::Error),

    #[error("upload exceeds {0} bytes")]
    FileTooLarge(u64),

    #[error("failed to open {0}: {1}")]
    OpenFailed(PathBuf, io::Error),
}

impl TransferError {
    /// Reply sent on the control channel when a transfer aborts with this error.
    pub fn to_ftp_response(&self) -> &'static str {
        match self {
            TransferError::Connect(..) | TransferError::ConnectTimeout(_) => {
                responses::CANT_OPEN_DATA_CONNECTION
            }
            TransferError::DataChannel(_) | TransferError::IdleTimeout(_) => {
                responses::TRANSFER_ABORTED
            }
            TransferError::LocalFile(_) => responses::LOCAL_ERROR,
            TransferError::FileTooLarge(_) => responses::STORAGE_EXCEEDED,
            TransferError::OpenFailed(..) => responses::FAILED_TO_OPEN_FILE,
        }
    }
}

/// Fatal control channel errors. Any of these ends the session.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Framing(#[from] FramerError),

    #[error("control channel write failed: {0}")]
    Io(#[from] io::Error),
}

/// Startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("server root {0} is unusable: {1}")]
    Root(PathBuf, io::Error),
}
