//! Session storage for persisting login state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use recipebook_core::error::{InvalidInputError, TransportError};
use recipebook_core::{
    AccessToken, Error, RefreshToken, Result, ServiceUrl, SessionTokens, TokenStore, UserInfo,
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    service: ServiceUrl,
    access_token: String,
    refresh_token: String,
    user_info: UserInfo,
}

/// Get the session file path.
fn session_path() -> anyhow::Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "recipebook").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("session.json"))
}

/// The service the stored session belongs to, if there is one.
pub fn stored_service() -> anyhow::Result<Option<ServiceUrl>> {
    let path = session_path()?;
    Ok(read_stored(&path)
        .context("Failed to read session file")?
        .map(|stored| stored.service))
}

fn read_stored(path: &Path) -> Result<Option<StoredSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path).map_err(TransportError::from)?;
    serde_json::from_str(&json).map(Some).map_err(invalid)
}

fn invalid(err: serde_json::Error) -> Error {
    InvalidInputError::Other {
        message: format!("invalid session file: {}", err),
    }
    .into()
}

/// Keeps the tokens of one service in a JSON file only the user can read.
///
/// A file written for another service reads as "no session".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    service: ServiceUrl,
}

impl FileTokenStore {
    /// The store in the user's data directory.
    pub fn new(service: ServiceUrl) -> anyhow::Result<Self> {
        Ok(Self::at(session_path()?, service))
    }

    pub fn at(path: impl Into<PathBuf>, service: ServiceUrl) -> Self {
        Self {
            path: path.into(),
            service,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        let stored = StoredSession {
            service: self.service.clone(),
            access_token: tokens.access_token.as_str().to_string(),
            refresh_token: tokens.refresh_token.as_str().to_string(),
            user_info: tokens.user_info.clone(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(TransportError::from)?;
        }
        let json = serde_json::to_string_pretty(&stored).map_err(invalid)?;
        fs::write(&self.path, json).map_err(TransportError::from)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path)
                .map_err(TransportError::from)?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(TransportError::from)?;
        }

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn read(&self) -> Result<Option<SessionTokens>> {
        let Some(stored) = read_stored(&self.path)? else {
            return Ok(None);
        };
        if stored.service != self.service {
            debug!(stored = %stored.service, "Stored session belongs to another service");
            return Ok(None);
        }
        Ok(Some(SessionTokens {
            access_token: AccessToken::new(stored.access_token),
            refresh_token: RefreshToken::new(stored.refresh_token),
            user_info: stored.user_info,
        }))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TransportError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> SessionTokens {
        SessionTokens {
            access_token: AccessToken::new("access-1"),
            refresh_token: RefreshToken::new("refresh-1"),
            user_info: UserInfo {
                id: "user-1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
        }
    }

    fn service(url: &str) -> ServiceUrl {
        ServiceUrl::new(url).unwrap()
    }

    #[test]
    fn saved_tokens_are_read_back_for_the_same_service() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::at(&path, service("http://localhost:8080"));

        assert!(store.read().unwrap().is_none());
        store.save(&tokens()).unwrap();
        assert_eq!(store.read().unwrap(), Some(tokens()));

        let stored = read_stored(&path).unwrap().unwrap();
        assert_eq!(stored.service, service("http://localhost:8080"));
    }

    #[test]
    fn session_of_another_service_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        FileTokenStore::at(&path, service("http://localhost:8080"))
            .save(&tokens())
            .unwrap();

        let other = FileTokenStore::at(&path, service("https://recipes.example.com"));
        assert!(other.read().unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_file_and_tolerates_absence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::at(&path, service("http://localhost:8080"));

        store.save(&tokens()).unwrap();
        store.clear().unwrap();
        assert!(!path.exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::at(&path, service("http://localhost:8080"));
        assert!(matches!(store.read(), Err(Error::InvalidInput(_))));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        FileTokenStore::at(&path, service("http://localhost:8080"))
            .save(&tokens())
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
