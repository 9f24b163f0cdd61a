//! File-backed session gateway.

use std::path::Path;

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use serde_json::json;
use tracing::{debug, info, instrument};

use recipebook_core::error::{AuthError, Error, InvalidInputError};
use recipebook_core::traits::SessionGateway;
use recipebook_core::{
    AccessToken, Credentials, RefreshToken, Registration, Result, SessionTokens, UserInfo,
};

use crate::store::{FileStore, LocalAccount};

fn map_bcrypt(err: bcrypt::BcryptError) -> Error {
    Error::InvalidInput(InvalidInputError::Other {
        message: err.to_string(),
    })
}

/// Access tokens carry the account id and its password hash, so a password
/// change invalidates every outstanding token.
fn make_token(account: &LocalAccount) -> AccessToken {
    let token = json!({
        "user_id": account.id,
        "password_hash": account.password_hash,
    })
    .to_string();
    AccessToken::new(token)
}

fn parse_token(token: &AccessToken) -> Option<(String, String)> {
    let value: serde_json::Value = serde_json::from_str(token.as_str()).ok()?;
    let user_id = value.get("user_id")?.as_str()?;
    let password_hash = value.get("password_hash")?.as_str()?;
    Some((user_id.to_string(), password_hash.to_string()))
}

/// Resolve the account behind an access token.
///
/// Tokens that do not parse or no longer match an account are treated as an
/// expired session.
pub(crate) fn validate_token(store: &FileStore, token: &AccessToken) -> Result<LocalAccount> {
    let (user_id, password_hash) = parse_token(token).ok_or(AuthError::SessionExpired)?;
    let account = store
        .get_account(&user_id)?
        .ok_or(AuthError::SessionExpired)?;

    if account.password_hash != password_hash {
        return Err(AuthError::SessionExpired.into());
    }

    Ok(account)
}

/// Sign-in, sign-up and refresh against a [`FileStore`].
#[derive(Debug, Clone)]
pub struct FileSessionGateway {
    store: FileStore,
}

impl FileSessionGateway {
    /// Create a gateway over the store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            store: FileStore::new(root),
        }
    }

    /// Access the underlying file store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }
}

#[async_trait]
impl SessionGateway for FileSessionGateway {
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn login(&self, credentials: &Credentials) -> Result<SessionTokens> {
        let account = self
            .store
            .find_account_by_email(credentials.username())?
            .ok_or_else(|| AuthError::InvalidCredentials("Account not found".to_string()))?;

        if !verify(credentials.password(), &account.password_hash).map_err(map_bcrypt)? {
            return Err(AuthError::InvalidCredentials("Invalid password".to_string()).into());
        }

        let refresh_token = self.store.issue_refresh_token(&account.id)?;
        info!(user = %account.id, "Signed in to local store");

        Ok(SessionTokens {
            access_token: make_token(&account),
            refresh_token: RefreshToken::new(refresh_token),
            user_info: account.user_info(),
        })
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<UserInfo> {
        let password_hash = hash(registration.password(), DEFAULT_COST).map_err(map_bcrypt)?;

        let account = self.store.create_account(
            &registration.first_name,
            &registration.last_name,
            &registration.email,
            &password_hash,
        )?;

        debug!(user = %account.id, "Registered local account");
        Ok(account.user_info())
    }

    #[instrument(skip(self, current))]
    async fn refresh(&self, current: &SessionTokens) -> Result<SessionTokens> {
        let user_id = self
            .store
            .redeem_refresh_token(current.refresh_token.as_str())?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let account = self
            .store
            .get_account(&user_id)?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        debug!(user = %account.id, "Refreshed access token");

        Ok(SessionTokens {
            access_token: make_token(&account),
            refresh_token: current.refresh_token.clone(),
            user_info: account.user_info(),
        })
    }
}
