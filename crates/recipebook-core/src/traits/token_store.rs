//! Token persistence trait.

use crate::tokens::SessionTokens;
use crate::Result;

/// Opaque persistence for the session tokens.
///
/// The medium is up to the implementation; its lifecycle follows login and
/// logout.
pub trait TokenStore: Send + Sync {
    fn save(&self, tokens: &SessionTokens) -> Result<()>;

    /// Returns the persisted tokens, if any.
    fn read(&self) -> Result<Option<SessionTokens>>;

    fn clear(&self) -> Result<()>;
}
