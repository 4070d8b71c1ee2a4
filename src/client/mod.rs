//! Client management system
//!
//! Handles control connections: line framing, per-session state and the
//! session loop.

pub mod control;
pub mod handler;
pub mod session;

pub use control::ControlChannel;
pub use handler::handle_client;
pub use session::Session;
