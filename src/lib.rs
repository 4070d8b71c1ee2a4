//! A minimal active-mode FTP server.
//!
//! Each control connection gets its own task, a [`client::Session`] and a
//! line framer; commands are resolved through an immutable
//! [`protocol::CommandTable`] and transfers run over a data connection the
//! server opens toward the endpoint announced with PORT.

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use server::{Server, ServerConfig};
