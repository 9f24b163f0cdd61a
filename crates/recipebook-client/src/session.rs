//! The session component: the only writer of the session context.

use tracing::{debug, info, instrument, warn};

use recipebook_core::error::AuthError;
use recipebook_core::{
    Credentials, Error, Registration, Result, SessionContext, SessionGateway, SessionWriter,
    TokenStore, UserInfo,
};

/// Signs in and out, refreshes tokens and keeps the token store in step
/// with the session context.
#[derive(Debug)]
pub struct SessionManager<S, T> {
    gateway: S,
    store: T,
    writer: SessionWriter,
}

impl<S, T> SessionManager<S, T>
where
    S: SessionGateway,
    T: TokenStore,
{
    /// Create the manager, restoring a persisted session if there is one.
    pub fn new(gateway: S, store: T) -> Result<Self> {
        let (_, writer) = SessionContext::new();
        if let Some(tokens) = store.read()? {
            debug!(user = %tokens.user_info.id, "Restored persisted session");
            writer.install(tokens);
        }
        Ok(Self {
            gateway,
            store,
            writer,
        })
    }

    /// A read handle for gateways and the shell.
    pub fn context(&self) -> SessionContext {
        self.writer.context()
    }

    pub fn is_authenticated(&self) -> bool {
        self.writer.context().is_authenticated()
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.writer.context().user_info()
    }

    pub fn gateway(&self) -> &S {
        &self.gateway
    }

    /// Sign in and start a new session.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserInfo> {
        let tokens = self.gateway.login(credentials).await?;
        self.store.save(&tokens)?;

        let user = tokens.user_info.clone();
        self.writer.install(tokens);
        info!(user = %user.id, "Signed in");
        Ok(user)
    }

    /// Create an account. The current session, if any, is untouched.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<UserInfo> {
        let user = self.gateway.register(registration).await?;
        info!(user = %user.id, "Registered account");
        Ok(user)
    }

    /// Renew the access token.
    ///
    /// An authentication failure ends the session. A refresh that completes
    /// after the session was replaced or cleared is discarded.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let context = self.writer.context();
        let generation = context.generation();
        let current = context.tokens().ok_or(AuthError::NotAuthenticated)?;

        match self.gateway.refresh(&current).await {
            Ok(tokens) => {
                if context.generation() != generation {
                    debug!("Session changed during refresh; discarding tokens");
                    return Err(AuthError::SessionCleared.into());
                }
                self.store.save(&tokens)?;
                self.writer.renew(tokens)?;
                debug!("Session renewed");
                Ok(())
            }
            Err(err) => {
                if err.requires_reauth() {
                    warn!(error = %err, "Refresh rejected; signing out");
                    self.logout()?;
                }
                Err(err)
            }
        }
    }

    /// End the session. Returns false if there was none.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<bool> {
        let had_session = self.writer.clear();
        self.store.clear()?;
        if had_session {
            info!("Signed out");
        }
        Ok(had_session)
    }

    /// React to a failure reported by any surface.
    ///
    /// Clears the session when the failure means it is no longer valid.
    /// Returns true if it did.
    pub fn handle_failure(&self, err: &Error) -> Result<bool> {
        if !err.requires_reauth() {
            return Ok(false);
        }
        warn!(error = %err, "Session is no longer valid");
        self.logout()
    }
}
