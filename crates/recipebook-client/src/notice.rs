//! Error notices rendered inline by the list and dialog surfaces.

use recipebook_core::Error;

/// An inline message shown next to the surface whose call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// The session is gone; the shell should send the user to sign in.
    pub requires_reauth: bool,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            requires_reauth: false,
        }
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        Self {
            message: err.user_message(),
            requires_reauth: err.requires_reauth(),
        }
    }
}
