//! Command table
//!
//! Maps each supported verb to its handler wrapped in an ordered chain of
//! validators. The table is built once at startup and only read afterwards,
//! so every session shares the same instance.

use std::collections::HashMap;

use crate::client::Session;
use crate::protocol::handlers;
use crate::protocol::responses;
use crate::protocol::{Command, CommandResult};

/// Signature shared by every command handler.
pub type Handler = fn(&mut Session, &[String]) -> CommandResult;

/// A precondition checked before a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// The session must be logged in.
    Authenticated,
    /// The command must carry exactly this many arguments.
    Arity(usize),
}

impl Validator {
    /// Returns `None` to proceed, or the reply that short-circuits the command.
    pub fn check(&self, session: &Session, command: &Command) -> Option<CommandResult> {
        match *self {
            Validator::Authenticated if !session.is_authenticated() => Some(
                CommandResult::failure("Not logged in", responses::NOT_LOGGED_IN),
            ),
            Validator::Arity(expected) if command.args.len() != expected => {
                Some(CommandResult::failure(
                    format!(
                        "{} expects {} argument(s), got {}",
                        command.verb,
                        expected,
                        command.args.len()
                    ),
                    responses::unrecognised(&command.verb),
                ))
            }
            _ => None,
        }
    }
}

/// A handler together with the validators guarding it.
pub struct CommandEntry {
    handler: Handler,
    validators: Vec<Validator>,
}

impl CommandEntry {
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Runs the validator chain in order, then the handler. The first
    /// failing validator's reply is returned and the handler is skipped.
    pub fn run(&self, session: &mut Session, command: &Command) -> CommandResult {
        for validator in &self.validators {
            if let Some(rejection) = validator.check(session, command) {
                return rejection;
            }
        }
        (self.handler)(session, &command.args)
    }
}

struct CommandSpec {
    verb: &'static str,
    handler: Handler,
    arity: Option<usize>,
    requires_auth: bool,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec { verb: "USER", handler: handlers::handle_cmd_user, arity: None, requires_auth: false },
    CommandSpec { verb: "PASS", handler: handlers::handle_cmd_pass, arity: None, requires_auth: false },
    CommandSpec { verb: "SYST", handler: handlers::handle_cmd_syst, arity: Some(0), requires_auth: true },
    CommandSpec { verb: "NOOP", handler: handlers::handle_cmd_noop, arity: Some(0), requires_auth: false },
    CommandSpec { verb: "QUIT", handler: handlers::handle_cmd_quit, arity: Some(0), requires_auth: false },
    CommandSpec { verb: "TYPE", handler: handlers::handle_cmd_type, arity: Some(1), requires_auth: true },
    CommandSpec { verb: "STRU", handler: handlers::handle_cmd_stru, arity: Some(1), requires_auth: true },
    CommandSpec { verb: "PORT", handler: handlers::handle_cmd_port, arity: Some(1), requires_auth: true },
    CommandSpec { verb: "STOR", handler: handlers::handle_cmd_stor, arity: Some(1), requires_auth: true },
    CommandSpec { verb: "RETR", handler: handlers::handle_cmd_retr, arity: Some(1), requires_auth: true },
];

/// Immutable verb to entry mapping.
pub struct CommandTable {
    entries: HashMap<&'static str, CommandEntry>,
}

impl CommandTable {
    /// Builds the table. With `auth_required == false` no entry carries the
    /// authentication validator.
    pub fn new(auth_required: bool) -> Self {
        let entries = COMMANDS
            .iter()
            .map(|spec| {
                let mut validators = Vec::new();
                if auth_required && spec.requires_auth {
                    validators.push(Validator::Authenticated);
                }
                if let Some(arity) = spec.arity {
                    validators.push(Validator::Arity(arity));
                }
                (
                    spec.verb,
                    CommandEntry {
                        handler: spec.handler,
                        validators,
                    },
                )
            })
            .collect();

        Self { entries }
    }

    /// Looks up an already upper-cased verb.
    pub fn get(&self, verb: &str) -> Option<&CommandEntry> {
        self.entries.get(verb)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
