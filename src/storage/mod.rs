//! File system storage management
//!
//! Handles path resolution and the session jail.

pub mod validation;

pub use validation::{is_within_root, resolve_existing_file, resolve_upload_target};
