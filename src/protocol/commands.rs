//! Module `commands`
//!
//! Defines the parsed form of one control channel line and the result type
//! every command handler returns.

use crate::transfer::TransferJob;

/// A command line split into its verb and arguments.
///
/// The verb is upper-cased so table lookups are case-insensitive; arguments
/// keep their original case and are split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

impl Command {
    /// Parses a raw line (without its CRLF). Returns `None` for blank lines.
    pub fn parse(raw: &str) -> Option<Command> {
        let mut parts = raw.split_whitespace();
        let verb = parts.next()?.to_ascii_uppercase();
        let args = parts.map(str::to_string).collect();
        Some(Command { verb, args })
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
    /// Preconditions passed; the dispatcher must run the job after sending
    /// the preliminary reply.
    Transfer(TransferJob),
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message.into()),
        }
    }

    pub fn failure(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(
            Command::parse("NOOP"),
            Some(Command {
                verb: "NOOP".into(),
                args: vec![]
            })
        );
        assert_eq!(Command::parse("quit").map(|c| c.verb), Some("QUIT".into()));
    }

    #[test]
    fn test_parse_commands_with_args() {
        let cmd = Command::parse("PORT 127,0,0,1,200,10").unwrap();
        assert_eq!(cmd.verb, "PORT");
        assert_eq!(cmd.args, vec!["127,0,0,1,200,10".to_string()]);

        let cmd = Command::parse("stor Upload.TXT").unwrap();
        assert_eq!(cmd.verb, "STOR");
        assert_eq!(cmd.args, vec!["Upload.TXT".to_string()]);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let cmd = Command::parse("  TYPE   I  ").unwrap();
        assert_eq!(cmd.verb, "TYPE");
        assert_eq!(cmd.args, vec!["I".to_string()]);

        let cmd = Command::parse("TYPE A N").unwrap();
        assert_eq!(cmd.args.len(), 2);
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t "), None);
    }
}
