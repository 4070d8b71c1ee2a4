//! Command handlers module
//!
//! One handler per supported verb. Handlers run only after the entry's
//! validator chain passed, mutate the session in place and return the reply
//! to send. Transfer verbs return a `TransferJob` for the dispatcher to run.

use log::{info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::client::Session;
use crate::protocol::responses;
use crate::protocol::{CommandResult, CommandStatus};
use crate::storage::{resolve_existing_file, resolve_upload_target};
use crate::transfer::{Direction, TransferJob, TransferMode};

/// Handles USER: records the name and marks the session authenticated.
/// No credential check is performed.
pub fn handle_cmd_user(session: &mut Session, args: &[String]) -> CommandResult {
    session.set_username(args.first().cloned());
    session.set_authenticated(true);
    CommandResult::success(responses::PASSWORD_REQUIRED)
}

/// Handles PASS: accepts any password.
pub fn handle_cmd_pass(session: &mut Session, _args: &[String]) -> CommandResult {
    session.set_authenticated(true);
    info!(
        "Client {} logged in as {}",
        session.peer(),
        session.username().unwrap_or("anonymous")
    );
    CommandResult::success(responses::LOGIN_SUCCESS)
}

pub fn handle_cmd_syst(_session: &mut Session, _args: &[String]) -> CommandResult {
    CommandResult::success(responses::SYSTEM_TYPE)
}

pub fn handle_cmd_noop(_session: &mut Session, _args: &[String]) -> CommandResult {
    CommandResult::success(responses::NOOP_OK)
}

/// Handles QUIT: replies and signals the session loop to close.
pub fn handle_cmd_quit(_session: &mut Session, _args: &[String]) -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(responses::GOODBYE.into()),
    }
}

/// Handles TYPE: `A` selects ASCII, `I` selects binary. Anything else
/// leaves the mode untouched.
pub fn handle_cmd_type(session: &mut Session, args: &[String]) -> CommandResult {
    let code = args.first().map(String::as_str).unwrap_or_default();
    match TransferMode::from_type_code(code) {
        Some(mode) => {
            session.set_mode(mode);
            CommandResult::success(responses::switching_mode(&mode.to_string()))
        }
        None => CommandResult::failure(
            format!("Unsupported type {}", code),
            responses::TYPE_NOT_IMPLEMENTED,
        ),
    }
}

/// Handles STRU: only file structure is supported.
pub fn handle_cmd_stru(_session: &mut Session, args: &[String]) -> CommandResult {
    match args.first() {
        Some(code) if code.eq_ignore_ascii_case("F") => {
            CommandResult::success(responses::STRUCTURE_FILE)
        }
        _ => CommandResult::failure("Unsupported structure", responses::BAD_STRU),
    }
}

/// Parses a PORT descriptor `h1,h2,h3,h4,p1,p2`.
///
/// Exactly six comma separated fields of plain ASCII digits, each within
/// `0..=255`.
pub fn parse_port_argument(arg: &str) -> Option<SocketAddrV4> {
    let fields = arg
        .split(',')
        .map(parse_port_field)
        .collect::<Option<Vec<u8>>>()?;

    match fields.as_slice() {
        &[h1, h2, h3, h4, p1, p2] => {
            let ip = Ipv4Addr::new(h1, h2, h3, h4);
            let port = u16::from(p1) * 256 + u16::from(p2);
            Some(SocketAddrV4::new(ip, port))
        }
        _ => None,
    }
}

fn parse_port_field(field: &str) -> Option<u8> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Handles PORT: stores the active-mode data endpoint. A malformed
/// descriptor leaves any earlier endpoint in place.
pub fn handle_cmd_port(session: &mut Session, args: &[String]) -> CommandResult {
    let arg = args.first().map(String::as_str).unwrap_or_default();
    match parse_port_argument(arg) {
        Some(endpoint) => {
            info!(
                "Client {} announced data endpoint {}",
                session.peer(),
                endpoint
            );
            session.set_pending_endpoint(endpoint);
            CommandResult::success(responses::PORT_OK)
        }
        None => CommandResult::failure(
            format!("Malformed PORT argument {}", arg),
            responses::WRONG_PORT_FORMAT,
        ),
    }
}

pub fn handle_cmd_stor(session: &mut Session, args: &[String]) -> CommandResult {
    prepare_transfer(session, args, Direction::Upload)
}

pub fn handle_cmd_retr(session: &mut Session, args: &[String]) -> CommandResult {
    prepare_transfer(session, args, Direction::Download)
}

/// Shared precondition stage of STOR and RETR.
///
/// The pending endpoint is consumed before anything else, so a rejected
/// path still requires a fresh PORT for the next transfer.
fn prepare_transfer(session: &mut Session, args: &[String], direction: Direction) -> CommandResult {
    let Some(endpoint) = session.take_pending_endpoint() else {
        return CommandResult::failure("No data endpoint", responses::USE_PORT_FIRST);
    };

    let raw = args.first().map(String::as_str).unwrap_or_default();
    let resolved = match direction {
        Direction::Upload => resolve_upload_target(session.root(), session.cwd(), raw),
        Direction::Download => resolve_existing_file(session.root(), session.cwd(), raw),
    };

    match resolved {
        Ok(path) => {
            info!(
                "Client {} {:?} {} via {} ({} mode)",
                session.peer(),
                direction,
                path.display(),
                endpoint,
                session.mode()
            );
            CommandResult {
                status: CommandStatus::Transfer(TransferJob {
                    direction,
                    path,
                    endpoint,
                }),
                message: Some(responses::opening_data_connection(
                    &session.mode().to_string(),
                    raw,
                )),
            }
        }
        Err(e) => {
            warn!("Client {} path {:?} rejected: {}", session.peer(), raw, e);
            CommandResult::failure(e.to_string(), responses::FAILED_TO_OPEN_FILE)
        }
    }
}
