//! FTP representation types
//!
//! Handles the TYPE command's two supported representations.

use std::fmt;

/// Representation type selected with TYPE.
///
/// Bytes are copied unchanged in both modes; the value is tracked and
/// reported so clients that insist on switching get a proper reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Ascii,
    Binary,
}

impl TransferMode {
    /// Maps a TYPE argument (`A` or `I`, any case) to a mode.
    pub fn from_type_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "A" => Some(TransferMode::Ascii),
            "I" => Some(TransferMode::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Ascii => write!(f, "ASCII"),
            TransferMode::Binary => write!(f, "Binary"),
        }
    }
}
