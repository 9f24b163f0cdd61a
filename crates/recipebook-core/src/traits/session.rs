//! Session gateway trait.

use async_trait::async_trait;

use crate::credentials::{Credentials, Registration};
use crate::tokens::{SessionTokens, UserInfo};
use crate::Result;

/// Stateless facade over the service's sign-in, sign-up and refresh calls.
///
/// The gateway never touches the session context; storing what it returns
/// is the session component's job.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Exchange credentials for a fresh token pair.
    async fn login(&self, credentials: &Credentials) -> Result<SessionTokens>;

    /// Create an account. Does not sign in.
    async fn register(&self, registration: &Registration) -> Result<UserInfo>;

    /// Use the refresh token of `current` to obtain renewed session tokens.
    ///
    /// Fields the service does not reissue are carried over from `current`.
    async fn refresh(&self, current: &SessionTokens) -> Result<SessionTokens>;
}
