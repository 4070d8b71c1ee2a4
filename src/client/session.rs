//! Module `session`
//!
//! Defines the `Session` struct holding per-connection protocol state:
//! identity, jail root, working directory, transfer mode and the pending
//! active-mode data endpoint.

use std::net::{SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use crate::transfer::TransferMode;

/// State of one control connection.
///
/// Owned by the task serving the connection and handed to handlers as
/// `&mut Session`; nothing here is shared between connections.
#[derive(Debug)]
pub struct Session {
    peer: SocketAddr,
    username: Option<String>,
    authenticated: bool,
    root: PathBuf,
    cwd: PathBuf,
    mode: TransferMode,
    pending_endpoint: Option<SocketAddrV4>,
}

impl Session {
    /// Creates a fresh session jailed to `root`, which must already be canonical.
    ///
    /// When authentication is disabled server-wide the session starts out
    /// authenticated.
    pub fn new(peer: SocketAddr, root: PathBuf, auth_disabled: bool) -> Self {
        Self {
            peer,
            username: None,
            authenticated: auth_disabled,
            cwd: root.clone(),
            root,
            mode: TransferMode::default(),
            pending_endpoint: None,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Jail root. Every transfer path must resolve below it.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory relative paths are resolved against.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    pub fn pending_endpoint(&self) -> Option<SocketAddrV4> {
        self.pending_endpoint
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    pub fn set_mode(&mut self, mode: TransferMode) {
        self.mode = mode;
    }

    /// Stores the endpoint announced by PORT, replacing any earlier one.
    pub fn set_pending_endpoint(&mut self, endpoint: SocketAddrV4) {
        self.pending_endpoint = Some(endpoint);
    }

    /// Removes and returns the pending endpoint. A transfer consumes the
    /// endpoint whatever its outcome.
    pub fn take_pending_endpoint(&mut self) -> Option<SocketAddrV4> {
        self.pending_endpoint.take()
    }
}
