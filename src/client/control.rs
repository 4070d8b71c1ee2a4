//! Control channel
//!
//! Wraps the control connection: reconstructs CRLF-terminated command lines
//! from arbitrary-sized reads and writes coded replies back.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::FramerError;

/// Size of a single read from the control socket.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Longest accepted command line, CRLF excluded.
pub const MAX_COMMAND_LENGTH: usize = 512;

/// Line framer plus reply writer over one control connection.
pub struct ControlChannel<S> {
    stream: S,
    buffer: Vec<u8>,
    pos: usize,
    filled: usize,
    max_line: usize,
}

impl<S> ControlChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, chunk_size: usize, max_line: usize) -> Self {
        Self {
            stream,
            buffer: vec![0; chunk_size.max(1)],
            pos: 0,
            filled: 0,
            max_line,
        }
    }

    /// Returns the next byte of the stream, refilling the buffer with one
    /// read when it is exhausted.
    async fn next_byte(&mut self) -> Result<u8, FramerError> {
        if self.pos >= self.filled {
            let n = self.stream.read(&mut self.buffer).await?;
            if n == 0 {
                return Err(FramerError::ConnectionClosed);
            }
            self.pos = 0;
            self.filled = n;
        }

        let byte = self.buffer[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads one command line and returns it without the trailing CRLF.
    ///
    /// Bytes following the CRLF stay buffered for the next call. A line
    /// longer than the cap is consumed up to its CRLF and reported as
    /// `LineTooLong` so the caller can answer and keep the session in sync.
    pub async fn read_command_line(&mut self) -> Result<Vec<u8>, FramerError> {
        let mut line = Vec::new();
        let mut overflow = false;
        let mut last = 0u8;

        loop {
            let byte = self.next_byte().await?;

            if overflow {
                if last == b'\r' && byte == b'\n' {
                    return Err(FramerError::LineTooLong(self.max_line));
                }
                last = byte;
                continue;
            }

            line.push(byte);
            if line.len() >= 2 && line.ends_with(b"\r\n") {
                line.truncate(line.len() - 2);
                return Ok(line);
            }

            // One extra byte leaves room for the trailing CR.
            if line.len() > self.max_line + 1 {
                overflow = true;
                last = byte;
                line.clear();
            }
        }
    }

    /// Sends `text` as one reply line, appending CRLF unless already present.
    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        let mut raw = Vec::with_capacity(text.len() + 2);
        raw.extend_from_slice(text.as_bytes());
        if !text.ends_with("\r\n") {
            raw.extend_from_slice(b"\r\n");
        }
        self.stream.write_all(&raw).await?;
        self.stream.flush().await
    }

    /// Shuts down the write side of the control connection. The socket
    /// itself is released when the channel is dropped.
    pub async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn channel<S>(stream: S) -> ControlChannel<S>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        ControlChannel::new(stream, READ_CHUNK_SIZE, MAX_COMMAND_LENGTH)
    }

    #[tokio::test]
    async fn test_single_read_line() {
        let mock = Builder::new().read(b"NOOP\r\n").build();
        let mut control = channel(mock);
        assert_eq!(control.read_command_line().await.unwrap(), b"NOOP");
    }

    #[tokio::test]
    async fn test_line_split_across_reads() {
        let mock = Builder::new()
            .read(b"PO")
            .read(b"RT 127,0,0,1")
            .read(b",200,10\r")
            .read(b"\n")
            .build();
        let mut control = channel(mock);
        assert_eq!(
            control.read_command_line().await.unwrap(),
            b"PORT 127,0,0,1,200,10"
        );
    }

    #[tokio::test]
    async fn test_every_partition_yields_same_line() {
        let wire: &[u8] = b"STOR some file.bin\r\n";
        for split in 1..wire.len() {
            let mock = Builder::new()
                .read(&wire[..split])
                .read(&wire[split..])
                .build();
            let mut control = channel(mock);
            assert_eq!(
                control.read_command_line().await.unwrap(),
                b"STOR some file.bin",
                "split at {}",
                split
            );
        }

        let mut builder = Builder::new();
        for byte in wire {
            builder.read(std::slice::from_ref(byte));
        }
        let mut control = channel(builder.build());
        assert_eq!(
            control.read_command_line().await.unwrap(),
            b"STOR some file.bin"
        );
    }

    #[tokio::test]
    async fn test_small_chunk_size() {
        let mock = Builder::new().read(b"SYST\r\nNOOP\r\n").build();
        let mut control = ControlChannel::new(mock, 3, MAX_COMMAND_LENGTH);
        assert_eq!(control.read_command_line().await.unwrap(), b"SYST");
        assert_eq!(control.read_command_line().await.unwrap(), b"NOOP");
    }

    #[tokio::test]
    async fn test_two_lines_in_one_read() {
        let mock = Builder::new().read(b"SYST\r\nNOOP\r\n").build();
        let mut control = channel(mock);
        assert_eq!(control.read_command_line().await.unwrap(), b"SYST");
        assert_eq!(control.read_command_line().await.unwrap(), b"NOOP");
        assert!(matches!(
            control.read_command_line().await,
            Err(FramerError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_bare_lf_does_not_end_line() {
        let mock = Builder::new().read(b"NO\nOP\r\n").build();
        let mut control = channel(mock);
        assert_eq!(control.read_command_line().await.unwrap(), b"NO\nOP");
    }

    #[tokio::test]
    async fn test_close_before_crlf() {
        let mock = Builder::new().read(b"NOO").build();
        let mut control = channel(mock);
        assert!(matches!(
            control.read_command_line().await,
            Err(FramerError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_overlong_line_is_skipped() {
        let mut wire = vec![b'A'; 40];
        wire.extend_from_slice(b"\r\nNOOP\r\n");
        let mock = Builder::new().read(&wire).build();
        let mut control = ControlChannel::new(mock, READ_CHUNK_SIZE, 16);
        assert!(matches!(
            control.read_command_line().await,
            Err(FramerError::LineTooLong(16))
        ));
        assert_eq!(control.read_command_line().await.unwrap(), b"NOOP");
    }

    #[tokio::test]
    async fn test_line_length_cap_is_exact() {
        let mut wire = vec![b'A'; 16];
        wire.extend_from_slice(b"\r\n");
        wire.extend(vec![b'B'; 17]);
        wire.extend_from_slice(b"\r\nNOOP\r\n");
        let mock = Builder::new().read(&wire).build();
        let mut control = ControlChannel::new(mock, READ_CHUNK_SIZE, 16);

        assert_eq!(control.read_command_line().await.unwrap(), vec![b'A'; 16]);
        assert!(matches!(
            control.read_command_line().await,
            Err(FramerError::LineTooLong(16))
        ));
        assert_eq!(control.read_command_line().await.unwrap(), b"NOOP");
    }

    #[tokio::test]
    async fn test_say_appends_crlf_once() {
        let mock = Builder::new()
            .write(b"200 NOOP ok.\r\n")
            .write(b"221 Goodbye.\r\n")
            .build();
        let mut control = channel(mock);
        control.say("200 NOOP ok.").await.unwrap();
        control.say("221 Goodbye.\r\n").await.unwrap();
    }
}
