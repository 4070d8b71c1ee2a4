//! FTP Response handling
//!
//! Defines the reply lines sent on the control channel. Every reply starts
//! with its three digit code; the control channel appends CRLF.

pub const GREETING: &str = "220 tiny-ftp-server ready.";
pub const GOODBYE: &str = "221 Goodbye.";
pub const SYSTEM_TYPE: &str = "215 UNIX Type: L8";
pub const NOOP_OK: &str = "200 NOOP ok.";
pub const STRUCTURE_FILE: &str = "200 Structure set to F.";
pub const PORT_OK: &str = "200 PORT command successful.";
pub const PASSWORD_REQUIRED: &str = "331 Please specify the password.";
pub const LOGIN_SUCCESS: &str = "230 Login successful.";

pub const STOR_OK: &str = "226 STOR file ok.";
pub const RETR_OK: &str = "226 RETR file ok.";

pub const USE_PORT_FIRST: &str = "425 Use PORT or PASV first.";
pub const CANT_OPEN_DATA_CONNECTION: &str = "425 Can't open data connection.";
pub const TRANSFER_ABORTED: &str = "426 Connection closed; transfer aborted.";
pub const LOCAL_ERROR: &str = "451 Requested action aborted: local error in processing.";

pub const SYNTAX_ERROR: &str = "500 Syntax error, command unrecognized.";
pub const COMMAND_TOO_LONG: &str = "500 Command too long.";
pub const NOT_IMPLEMENTED: &str = "502 Not implemented.";
pub const TYPE_NOT_IMPLEMENTED: &str = "504 Command not implemented for that parameter.";
pub const BAD_STRU: &str = "504 Bad STRU command.";
pub const WRONG_PORT_FORMAT: &str = "504 Wrong ip or port format.";
pub const NOT_LOGGED_IN: &str = "530 Please login with USER and PASS.";
pub const FAILED_TO_OPEN_FILE: &str = "550 Failed to open file.";
pub const STORAGE_EXCEEDED: &str = "552 Exceeded storage allocation.";

/// Reply for a known verb called with the wrong number of arguments.
pub fn unrecognised(verb: &str) -> String {
    format!("500 Unrecognised {} command.", verb)
}

/// Reply confirming a TYPE change; `mode` is the display name of the new mode.
pub fn switching_mode(mode: &str) -> String {
    format!("200 Switching to {} mode.", mode)
}

/// Preliminary reply sent before the data connection is opened.
pub fn opening_data_connection(mode: &str, path: &str) -> String {
    format!("150 Opening {} mode data connection for {}.", mode, path)
}
