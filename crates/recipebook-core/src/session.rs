//! Explicit session context shared by authenticated gateways.
//!
//! There is exactly one writer per context: the [`SessionWriter`] returned by
//! [`SessionContext::new`]. Gateways hold a [`SessionContext`] clone and may
//! only read from it.
//!
//! Every [`SessionWriter::install`] and [`SessionWriter::clear`] starts a new
//! session generation. A gateway takes an [`AuthSnapshot`] before issuing a
//! request and calls [`SessionContext::ensure_current`] once the response is
//! in; if the session was cleared or replaced meanwhile the response is
//! rejected as unauthenticated instead of landing in the new context.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::AuthError;
use crate::tokens::{AccessToken, SessionTokens, UserInfo};
use crate::Result;

#[derive(Debug, Default)]
struct Slot {
    tokens: Option<SessionTokens>,
    generation: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    slot: RwLock<Slot>,
}

impl SessionState {
    fn read(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-only view of the process-wide session.
///
/// Cheap to clone; all clones observe the same session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<SessionState>,
}

/// The access token a request was issued with, tagged with its generation.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
    access_token: AccessToken,
    generation: u64,
}

impl AuthSnapshot {
    /// Returns the access token to put on the request.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the session generation the token belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl SessionContext {
    /// Create an empty (signed-out) context together with its only writer.
    pub fn new() -> (SessionContext, SessionWriter) {
        let inner = Arc::new(SessionState::default());
        (
            SessionContext {
                inner: inner.clone(),
            },
            SessionWriter { inner },
        )
    }

    /// Take a snapshot of the current access token, if signed in.
    pub fn snapshot(&self) -> Option<AuthSnapshot> {
        let slot = self.inner.read();
        slot.tokens.as_ref().map(|tokens| AuthSnapshot {
            access_token: tokens.access_token.clone(),
            generation: slot.generation,
        })
    }

    /// Like [`snapshot`](Self::snapshot) but fails when signed out.
    pub fn authorize(&self) -> Result<AuthSnapshot> {
        self.snapshot()
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Fails with [`AuthError::SessionCleared`] when the session the snapshot
    /// was taken from is gone.
    pub fn ensure_current(&self, snapshot: &AuthSnapshot) -> Result<()> {
        let slot = self.inner.read();
        if slot.generation == snapshot.generation && slot.tokens.is_some() {
            Ok(())
        } else {
            Err(AuthError::SessionCleared.into())
        }
    }

    /// Returns a copy of the current tokens.
    pub fn tokens(&self) -> Option<SessionTokens> {
        self.inner.read().tokens.clone()
    }

    /// Returns the signed-in user's profile.
    pub fn user_info(&self) -> Option<UserInfo> {
        self.inner
            .read()
            .tokens
            .as_ref()
            .map(|tokens| tokens.user_info.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().tokens.is_some()
    }

    /// Returns the current session generation.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }
}

/// The single write capability for a [`SessionContext`].
///
/// Deliberately not `Clone`: whoever owns it is the session component.
#[derive(Debug)]
pub struct SessionWriter {
    inner: Arc<SessionState>,
}

impl SessionWriter {
    /// Returns a read handle on the context this writer controls.
    pub fn context(&self) -> SessionContext {
        SessionContext {
            inner: self.inner.clone(),
        }
    }

    /// Start a new session with the given tokens.
    pub fn install(&self, tokens: SessionTokens) {
        let mut slot = self.inner.write();
        slot.tokens = Some(tokens);
        slot.generation += 1;
    }

    /// Swap in refreshed tokens for the current session.
    ///
    /// Requests already in flight stay valid; the generation is unchanged.
    pub fn renew(&self, tokens: SessionTokens) -> Result<()> {
        let mut slot = self.inner.write();
        if slot.tokens.is_none() {
            return Err(AuthError::NotAuthenticated.into());
        }
        slot.tokens = Some(tokens);
        Ok(())
    }

    /// End the session. Returns true if there was one.
    pub fn clear(&self) -> bool {
        let mut slot = self.inner.write();
        let had_session = slot.tokens.take().is_some();
        slot.generation += 1;
        had_session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::RefreshToken;

    fn tokens(access: &str) -> SessionTokens {
        SessionTokens {
            access_token: AccessToken::new(access),
            refresh_token: RefreshToken::new("refresh"),
            user_info: UserInfo {
                id: "user-1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
        }
    }

    #[test]
    fn signed_out_context_refuses_to_authorize() {
        let (context, _writer) = SessionContext::new();
        assert!(!context.is_authenticated());
        assert!(matches!(
            context.authorize(),
            Err(crate::Error::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[test]
    fn snapshot_survives_renewal() {
        let (context, writer) = SessionContext::new();
        writer.install(tokens("first"));
        let snapshot = context.authorize().unwrap();

        writer.renew(tokens("second")).unwrap();

        assert!(context.ensure_current(&snapshot).is_ok());
        assert_eq!(
            context.snapshot().unwrap().access_token().as_str(),
            "second"
        );
    }

    #[test]
    fn snapshot_is_rejected_after_clear() {
        let (context, writer) = SessionContext::new();
        writer.install(tokens("first"));
        let snapshot = context.authorize().unwrap();

        assert!(writer.clear());

        assert!(matches!(
            context.ensure_current(&snapshot),
            Err(crate::Error::Auth(AuthError::SessionCleared))
        ));
    }

    #[test]
    fn snapshot_is_rejected_after_new_login() {
        let (context, writer) = SessionContext::new();
        writer.install(tokens("first"));
        let snapshot = context.authorize().unwrap();

        writer.clear();
        writer.install(tokens("second"));

        assert!(context.ensure_current(&snapshot).is_err());
    }

    #[test]
    fn renew_requires_a_session() {
        let (_context, writer) = SessionContext::new();
        assert!(writer.renew(tokens("x")).is_err());
        assert!(!writer.clear());
    }
}
