use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::client::{ControlChannel, Session};
use crate::error::{ClientError, FramerError};
use crate::protocol::{Flow, responses};
use crate::server::ServerContext;

/// Handles one FTP control connection until QUIT, peer close or a fatal
/// control channel error.
///
/// - Greets the client, then reads, dispatches and answers one command at a time.
/// - Owns the session; nothing is shared with other connections.
/// - Closes the control channel on every exit path.
pub async fn handle_client<S>(stream: S, peer: SocketAddr, context: Arc<ServerContext>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let config = &context.config;
    let mut control = ControlChannel::new(stream, config.buffer_size, config.max_command_length);
    let mut session = Session::new(peer, context.root.clone(), config.auth_disabled);

    info!("Client connected: {}", peer);

    match serve(&context, &mut session, &mut control).await {
        Ok(()) => info!("Client {} quit", peer),
        Err(ClientError::Framing(FramerError::ConnectionClosed)) => {
            info!("Connection closed by client {}", peer)
        }
        Err(e) => warn!("Session with {} ended: {}", peer, e),
    }

    if let Err(e) = control.close().await {
        debug!("Failed to shut down control channel for {}: {}", peer, e);
    }
    info!("Client {} disconnected", peer);
}

async fn serve<S>(
    context: &ServerContext,
    session: &mut Session,
    control: &mut ControlChannel<S>,
) -> Result<(), ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    control.say(responses::GREETING).await?;

    loop {
        let raw = match control.read_command_line().await {
            Ok(raw) => raw,
            Err(FramerError::LineTooLong(max)) => {
                warn!("Client {} sent a line over {} bytes", session.peer(), max);
                control.say(responses::COMMAND_TOO_LONG).await?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let line = String::from_utf8_lossy(&raw);
        info!("Received from {}: {}", session.peer(), redact(&line));

        match context.dispatcher.dispatch(session, control, &line).await? {
            Flow::Continue => {}
            Flow::Close => return Ok(()),
        }
    }
}

/// Hides the argument of PASS in log lines.
fn redact(line: &str) -> &str {
    let verb = line.trim_start().get(..4);
    if verb.is_some_and(|verb| verb.eq_ignore_ascii_case("PASS")) {
        "PASS ****"
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerConfig;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn context(auth_disabled: bool) -> Arc<ServerContext> {
        let config = ServerConfig {
            auth_disabled,
            ..ServerConfig::default()
        };
        Arc::new(ServerContext::new(config, std::env::temp_dir()))
    }

    #[test]
    fn test_redact_password() {
        assert_eq!(redact("PASS hunter2"), "PASS ****");
        assert_eq!(redact("pass hunter2"), "PASS ****");
        assert_eq!(redact("USER bob"), "USER bob");
        assert_eq!(redact("PA"), "PA");
    }

    #[tokio::test]
    async fn test_session_over_duplex() {
        let (server_side, client_side) = tokio::io::duplex(1024);
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let task = tokio::spawn(handle_client(server_side, peer, context(false)));

        let (read_half, mut write_half) = tokio::io::split(client_side);
        let mut lines = BufReader::new(read_half).lines();

        assert!(lines.next_line().await.unwrap().unwrap().starts_with("220"));

        write_half.write_all(b"SYST\r\n").await.unwrap();
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            responses::NOT_LOGGED_IN
        );

        write_half.write_all(b"USER a\r\nPASS b\r\nSYST\r\n").await.unwrap();
        assert!(lines.next_line().await.unwrap().unwrap().starts_with("331"));
        assert!(lines.next_line().await.unwrap().unwrap().starts_with("230"));
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "215 UNIX Type: L8"
        );

        write_half.write_all(b"QUIT\r\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "221 Goodbye.");
        assert_eq!(lines.next_line().await.unwrap(), None);

        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_session_ends_when_peer_closes() {
        let (server_side, client_side) = tokio::io::duplex(1024);
        let peer: SocketAddr = "127.0.0.1:40001".parse().unwrap();
        let task = tokio::spawn(handle_client(server_side, peer, context(true)));

        let (read_half, mut write_half) = tokio::io::split(client_side);
        let mut lines = BufReader::new(read_half).lines();
        assert!(lines.next_line().await.unwrap().unwrap().starts_with("220"));

        write_half.write_all(b"NOOP\r\nNOO").await.unwrap();
        assert!(lines.next_line().await.unwrap().unwrap().starts_with("200"));
        write_half.shutdown().await.unwrap();

        task.await.unwrap();
    }
}
