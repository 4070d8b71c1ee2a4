//! Command dispatcher
//!
//! Resolves one command line against the command table, writes the reply
//! and runs any transfer the handler scheduled.

use log::{info, warn};
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::client::{ControlChannel, Session};
use crate::protocol::responses;
use crate::protocol::{Command, CommandResult, CommandStatus, CommandTable};
use crate::transfer::{TransferSettings, run_transfer};

/// What the session loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

pub struct Dispatcher {
    table: CommandTable,
    transfer: TransferSettings,
}

impl Dispatcher {
    pub fn new(table: CommandTable, transfer: TransferSettings) -> Self {
        Self { table, transfer }
    }

    /// Parses `line` and runs the matching entry. Unknown verbs and blank
    /// lines are answered here without touching the session.
    pub fn execute(&self, session: &mut Session, line: &str) -> CommandResult {
        let Some(command) = Command::parse(line) else {
            return CommandResult::failure("Empty command", responses::SYNTAX_ERROR);
        };

        match self.table.get(&command.verb) {
            Some(entry) => entry.run(session, &command),
            None => CommandResult::failure(
                format!("Unknown command {}", command.verb),
                responses::NOT_IMPLEMENTED,
            ),
        }
    }

    /// Executes one command line and sends its reply on `control`.
    ///
    /// Transfer commands block here until the data transfer finished; their
    /// failures are answered on the control channel and never end the
    /// session. Only control channel write errors are returned.
    pub async fn dispatch<S>(
        &self,
        session: &mut Session,
        control: &mut ControlChannel<S>,
        line: &str,
    ) -> io::Result<Flow>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let result = self.execute(session, line);

        match result.status {
            CommandStatus::Transfer(job) => {
                if let Some(msg) = result.message {
                    control.say(&msg).await?;
                }

                let reply = match run_transfer(&job, &self.transfer).await {
                    Ok(bytes) => {
                        info!(
                            "Client {} {:?} of {} finished ({} bytes)",
                            session.peer(),
                            job.direction,
                            job.path.display(),
                            bytes
                        );
                        job.direction.success_reply()
                    }
                    Err(e) => {
                        warn!(
                            "Client {} {:?} of {} failed: {}",
                            session.peer(),
                            job.direction,
                            job.path.display(),
                            e
                        );
                        e.to_ftp_response()
                    }
                };
                control.say(reply).await?;
                Ok(Flow::Continue)
            }
            CommandStatus::CloseConnection => {
                if let Some(msg) = result.message {
                    control.say(&msg).await?;
                }
                info!("Client {} requested to quit", session.peer());
                Ok(Flow::Close)
            }
            CommandStatus::Success => {
                if let Some(msg) = result.message {
                    control.say(&msg).await?;
                }
                Ok(Flow::Continue)
            }
            CommandStatus::Failure(reason) => {
                info!("Command from {} rejected: {}", session.peer(), reason);
                if let Some(msg) = result.message {
                    control.say(&msg).await?;
                }
                Ok(Flow::Continue)
            }
        }
    }
}
