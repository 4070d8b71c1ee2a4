//! Server core functionality
//!
//! This module contains the listener bootstrap and the server configuration.

pub mod config;
pub mod core;

pub use self::config::ServerConfig;
pub use self::core::{Server, ServerContext};
