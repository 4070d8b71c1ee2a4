//! FTP Protocol implementation
//!
//! Handles command parsing, the command table, dispatch and reply texts.

pub mod commands;
pub mod dispatcher;
pub mod handlers;
pub mod responses;
pub mod table;

pub use commands::{Command, CommandResult, CommandStatus};
pub use dispatcher::{Dispatcher, Flow};
pub use table::{CommandEntry, CommandTable, Validator};
