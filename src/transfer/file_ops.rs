//! Module `file_ops`
//!
//! Copies bytes between a data channel and a file in fixed-size chunks.
//! Every data channel read or write is bounded by the idle timeout, and the
//! file handle is closed before either function returns.

use log::{error, info};
use std::io;
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::error::TransferError;
use crate::transfer::TransferSettings;

/// Runs one data channel operation under the idle timeout.
async fn on_data_channel<T>(
    settings: &TransferSettings,
    op: impl Future<Output = io::Result<T>>,
) -> Result<T, TransferError> {
    match timeout(settings.idle_timeout, op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TransferError::DataChannel(e)),
        Err(_) => Err(TransferError::IdleTimeout(settings.idle_timeout)),
    }
}

/// Creates a uniquely named hidden sibling of `target` for one upload.
/// The file is deleted when the returned path is dropped without being
/// persisted.
fn create_temp_for(target: &Path) -> io::Result<(std::fs::File, TempPath)> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let prefix = format!(".{}.", name);

    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(dir)
        .map(NamedTempFile::into_parts)
}

/// Receives an upload from `data` into `target` until end-of-stream.
///
/// Bytes land in a temporary file private to this upload that replaces
/// `target` only once the whole stream arrived. On any failure the
/// temporary file is removed and `target` is left untouched.
pub async fn receive_file<R>(
    data: &mut R,
    target: &Path,
    settings: &TransferSettings,
) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
{
    let (std_file, temp_path) = create_temp_for(target)
        .map_err(|e| TransferError::OpenFailed(target.to_path_buf(), e))?;
    info!(
        "Starting file upload: {} -> {}",
        temp_path.display(),
        target.display()
    );

    let mut file = File::from_std(std_file);
    let copied = copy_into_file(data, &mut file, settings).await;
    drop(file);

    let outcome = match copied {
        Ok(total) => temp_path
            .persist(target)
            .map(|_| total)
            .map_err(|e| TransferError::LocalFile(e.error)),
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(total) => info!(
            "File upload completed: {} ({} bytes)",
            target.display(),
            total
        ),
        Err(e) => error!("File upload to {} failed: {}", target.display(), e),
    }

    outcome
}

async fn copy_into_file<R>(
    data: &mut R,
    file: &mut File,
    settings: &TransferSettings,
) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; settings.buffer_size];
    let mut total = 0u64;

    loop {
        let n = on_data_channel(settings, data.read(&mut buffer)).await?;
        if n == 0 {
            break;
        }

        total += n as u64;
        if total > settings.max_file_size {
            return Err(TransferError::FileTooLarge(settings.max_file_size));
        }

        file.write_all(&buffer[..n])
            .await
            .map_err(TransferError::LocalFile)?;
    }

    file.flush().await.map_err(TransferError::LocalFile)?;
    Ok(total)
}

/// Sends `source` over `data`, then shuts down the write side so the
/// client sees end-of-file.
pub async fn send_file<W>(
    data: &mut W,
    source: &Path,
    settings: &TransferSettings,
) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin,
{
    info!("Starting file download: {}", source.display());

    let mut file = File::open(source)
        .await
        .map_err(|e| TransferError::OpenFailed(source.to_path_buf(), e))?;

    let mut buffer = vec![0u8; settings.buffer_size];
    let mut total = 0u64;

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .map_err(TransferError::LocalFile)?;
        if n == 0 {
            break;
        }

        on_data_channel(settings, data.write_all(&buffer[..n])).await?;
        total += n as u64;
    }

    on_data_channel(settings, data.flush()).await?;
    on_data_channel(settings, data.shutdown()).await?;

    info!(
        "File download completed: {} ({} bytes)",
        source.display(),
        total
    );
    Ok(total)
}
