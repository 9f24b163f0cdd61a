//! Filesystem storage for the file-backed recipe book.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use recipebook_core::error::{Error, FieldViolation, InvalidInputError, ProtocolError};
use recipebook_core::{PageRequest, PageResult, Recipe, RecordId, Result, UserInfo};

/// How long an issued refresh token stays redeemable.
pub(crate) const REFRESH_TOKEN_TTL_SECS: i64 = 3600;

pub(crate) fn map_io(err: std::io::Error) -> Error {
    Error::Transport(err.into())
}

pub(crate) fn map_json(err: serde_json::Error) -> Error {
    Error::InvalidInput(InvalidInputError::Other {
        message: err.to_string(),
    })
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Account metadata stored in the local store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAccount {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    /// Password hash (bcrypt).
    pub password_hash: String,
}

impl LocalAccount {
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// A redeemable refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RefreshGrant {
    user_id: String,
    issued_at: String,
}

/// Holds the store-wide write lock until dropped.
struct WriteLock(File);

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(err) = self.0.unlock() {
            warn!(error = %err, "Failed to release store lock");
        }
    }
}

/// Filesystem-backed storage for accounts, recipes and refresh tokens.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("recipebook")
    }

    fn accounts_dir(&self) -> PathBuf {
        self.data_dir().join("accounts")
    }

    fn account_path(&self, id: &str) -> PathBuf {
        self.accounts_dir().join(id).join("account.json")
    }

    fn recipes_dir(&self, owner: &str) -> PathBuf {
        self.data_dir().join("recipes").join(owner)
    }

    fn recipe_path(&self, owner: &str, id: &RecordId) -> PathBuf {
        self.recipes_dir(owner).join(format!("{}.json", id.as_str()))
    }

    fn token_path(&self, token: &str) -> PathBuf {
        self.data_dir().join("tokens").join(format!("{}.json", token))
    }

    fn lock_path(&self) -> PathBuf {
        self.data_dir().join("store.lock")
    }

    /// Take the exclusive store lock for a read-modify-write sequence.
    fn lock(&self) -> Result<WriteLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(map_io)?;

        lock_file.lock_exclusive().map_err(map_io)?;
        Ok(WriteLock(lock_file))
    }

    /// Write JSON through a temp file so readers never see a partial document.
    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(value).map_err(map_json)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(map_io)?;
        fs::rename(&temp_path, path).map_err(map_io)?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(map_io)?;
        serde_json::from_str(&content).map(Some).map_err(map_json)
    }

    // ========================================================================
    // Account Management
    // ========================================================================

    #[instrument(skip(self, password_hash))]
    pub fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<LocalAccount> {
        let _lock = self.lock()?;

        if self.find_account_by_email(email)?.is_some() {
            return Err(ProtocolError::new(409, Some("Email is already registered".to_string()))
                .into());
        }

        let account = LocalAccount {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: now(),
            password_hash: password_hash.to_string(),
        };

        Self::write_json(&self.account_path(&account.id), &account)?;
        debug!(id = %account.id, "Created local account");

        Ok(account)
    }

    pub fn get_account(&self, id: &str) -> Result<Option<LocalAccount>> {
        if RecordId::new(id).is_err() {
            return Ok(None);
        }
        Self::read_json(&self.account_path(id))
    }

    pub fn list_accounts(&self) -> Result<Vec<LocalAccount>> {
        let accounts_dir = self.accounts_dir();

        if !accounts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut accounts = Vec::new();

        for entry in fs::read_dir(&accounts_dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let account_file = entry.path().join("account.json");

            if account_file.exists() {
                let content = fs::read_to_string(&account_file).map_err(map_io)?;
                if let Ok(account) = serde_json::from_str::<LocalAccount>(&content) {
                    accounts.push(account);
                }
            }
        }

        Ok(accounts)
    }

    /// Email lookup is case-insensitive.
    pub fn find_account_by_email(&self, email: &str) -> Result<Option<LocalAccount>> {
        let accounts = self.list_accounts()?;
        Ok(accounts
            .into_iter()
            .find(|a| a.email.eq_ignore_ascii_case(email)))
    }

    // ========================================================================
    // Refresh Tokens
    // ========================================================================

    #[instrument(skip(self))]
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let grant = RefreshGrant {
            user_id: user_id.to_string(),
            issued_at: now(),
        };

        let _lock = self.lock()?;
        Self::write_json(&self.token_path(&token), &grant)?;
        debug!("Issued refresh token");

        Ok(token)
    }

    /// Returns the owner of a live refresh token. Expired tokens are removed.
    #[instrument(skip(self, token))]
    pub fn redeem_refresh_token(&self, token: &str) -> Result<Option<String>> {
        if Uuid::parse_str(token).is_err() {
            return Ok(None);
        }

        let path = self.token_path(token);
        let Some(grant) = Self::read_json::<RefreshGrant>(&path)? else {
            return Ok(None);
        };

        let expired = DateTime::parse_from_rfc3339(&grant.issued_at)
            .map(|issued| {
                Utc::now() - issued.with_timezone(&Utc) > Duration::seconds(REFRESH_TOKEN_TTL_SECS)
            })
            .unwrap_or(true);

        if expired {
            let _lock = self.lock()?;
            if path.exists() {
                fs::remove_file(&path).map_err(map_io)?;
            }
            debug!("Refresh token expired");
            return Ok(None);
        }

        Ok(Some(grant.user_id))
    }

    // ========================================================================
    // Recipe Operations
    // ========================================================================

    /// The checks the service applies before storing a recipe.
    fn check_recipe(recipe: &Recipe) -> Result<()> {
        let mut details = Vec::new();

        let name_len = recipe.name.chars().count();
        if !(5..=255).contains(&name_len) {
            details.push(FieldViolation {
                field: "name",
                message: "size must be between 5 and 255".to_string(),
            });
        }
        if recipe.suitable_for < 1 {
            details.push(FieldViolation {
                field: "suitableFor",
                message: "must be greater than or equal to 1".to_string(),
            });
        }
        if recipe.ingredients.is_empty() {
            details.push(FieldViolation {
                field: "ingredients",
                message: "At least one ingredient is required.".to_string(),
            });
        }
        if recipe.cooking_instruction.trim().is_empty() {
            details.push(FieldViolation {
                field: "cookingInstruction",
                message: "Cooking instruction is required".to_string(),
            });
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::new(400, Some("Validation error".to_string()))
                .with_details(
                    details
                        .into_iter()
                        .map(|v| format!("{}: {}", v.field, v.message))
                        .collect(),
                )
                .into())
        }
    }

    #[instrument(skip(self, recipe))]
    pub fn create_recipe(&self, owner: &str, recipe: &Recipe) -> Result<Recipe> {
        Self::check_recipe(recipe)?;

        let id = RecordId::new(Uuid::new_v4().to_string())?;
        let stored = Recipe {
            id: Some(id.clone()),
            created_at: Some(now()),
            ..recipe.clone()
        };

        let _lock = self.lock()?;
        Self::write_json(&self.recipe_path(owner, &id), &stored)?;
        debug!(id = %id, "Created recipe");

        Ok(stored)
    }

    #[instrument(skip(self))]
    pub fn get_recipe(&self, owner: &str, id: &RecordId) -> Result<Recipe> {
        Self::read_json(&self.recipe_path(owner, id))?
            .ok_or_else(|| Error::not_found(id.as_str()))
    }

    #[instrument(skip(self, recipe))]
    pub fn update_recipe(&self, owner: &str, id: &RecordId, recipe: &Recipe) -> Result<Recipe> {
        Self::check_recipe(recipe)?;

        let _lock = self.lock()?;
        let path = self.recipe_path(owner, id);
        let existing: Recipe =
            Self::read_json(&path)?.ok_or_else(|| Error::not_found(id.as_str()))?;

        let stored = Recipe {
            id: existing.id,
            created_at: existing.created_at,
            ..recipe.clone()
        };
        Self::write_json(&path, &stored)?;
        debug!(id = %id, "Updated recipe");

        Ok(stored)
    }

    /// One page of the owner's recipes, oldest first.
    #[instrument(skip(self))]
    pub fn list_recipes(&self, owner: &str, request: PageRequest) -> Result<PageResult<Recipe>> {
        let dir = self.recipes_dir(owner);
        let mut recipes = Vec::new();

        if dir.exists() {
            for entry in fs::read_dir(&dir).map_err(map_io)? {
                let path = entry.map_err(map_io)?.path();
                if !path.extension().is_some_and(|ext| ext == "json") {
                    continue;
                }
                match Self::read_json::<Recipe>(&path) {
                    Ok(Some(recipe)) => recipes.push(recipe),
                    Ok(None) => {}
                    Err(err) => warn!(path = %path.display(), error = %err, "Skipping unreadable recipe"),
                }
            }
        }

        recipes.sort_by(|a, b| {
            (a.created_at.as_deref(), a.id.as_ref().map(RecordId::as_str))
                .cmp(&(b.created_at.as_deref(), b.id.as_ref().map(RecordId::as_str)))
        });

        let total_items = recipes.len() as u64;
        let page_size = u64::from(request.page_size());
        let total_pages = total_items.div_ceil(page_size);
        let start = u64::from(request.page_index()).saturating_mul(page_size);

        let contents = recipes
            .into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(request.page_size() as usize)
            .collect();

        Ok(PageResult {
            contents,
            total_items,
            total_pages,
            current_page: request.page_index(),
        })
    }

    #[instrument(skip(self))]
    pub fn delete_recipe(&self, owner: &str, id: &RecordId) -> Result<()> {
        let _lock = self.lock()?;
        let path = self.recipe_path(owner, id);

        if !path.exists() {
            return Err(Error::not_found(id.as_str()));
        }

        fs::remove_file(&path).map_err(map_io)?;
        debug!(id = %id, "Deleted recipe");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn recipe(name: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            suitable_for: 2,
            ingredients: vec!["salt".to_string()],
            cooking_instruction: "Season.".to_string(),
            ..Recipe::blank()
        }
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.create_account("Ada", "L", "ada@example.com", "hash").unwrap();
        let err = store
            .create_account("Ada", "L", "ADA@example.com", "hash")
            .unwrap_err();

        assert!(matches!(err, Error::Protocol(ref p) if p.status == 409));
    }

    #[test]
    fn recipes_are_listed_oldest_first_and_paginated() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        for name in ["First dish", "Second dish", "Third dish"] {
            store.create_recipe("owner", &recipe(name)).unwrap();
        }

        let first = store
            .list_recipes("owner", PageRequest::new(0, 2).unwrap())
            .unwrap();
        assert_eq!(first.total_items, 3);
        assert_eq!(first.total_pages, 2);
        let names: Vec<_> = first.contents.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First dish", "Second dish"]);

        let second = store
            .list_recipes("owner", PageRequest::new(1, 2).unwrap())
            .unwrap();
        assert_eq!(second.contents.len(), 1);
        assert_eq!(second.contents[0].name, "Third dish");

        let beyond = store
            .list_recipes("owner", PageRequest::new(5, 2).unwrap())
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[test]
    fn recipes_are_scoped_to_owner() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let created = store.create_recipe("alice", &recipe("Alice stew")).unwrap();
        let id = created.id.unwrap();

        assert!(matches!(
            store.get_recipe("bob", &id),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_recipe("bob", &id),
            Err(Error::NotFound { .. })
        ));
        assert!(store.get_recipe("alice", &id).is_ok());
    }

    #[test]
    fn update_keeps_identity_fields() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let created = store.create_recipe("owner", &recipe("Plain rice")).unwrap();
        let id = created.id.clone().unwrap();

        let updated = store
            .update_recipe("owner", &id, &recipe("Fried rice"))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Fried rice");
    }

    #[test]
    fn invalid_recipe_is_rejected_with_details() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let err = store.create_recipe("owner", &Recipe::blank()).unwrap_err();
        match err {
            Error::Protocol(p) => {
                assert_eq!(p.status, 400);
                assert!(p.details.iter().any(|d| d.starts_with("name:")));
                assert!(p.details.iter().any(|d| d.starts_with("suitableFor:")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn refresh_tokens_redeem_until_removed() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let token = store.issue_refresh_token("user-1").unwrap();
        assert_eq!(
            store.redeem_refresh_token(&token).unwrap().as_deref(),
            Some("user-1")
        );
        assert_eq!(store.redeem_refresh_token("not-a-token").unwrap(), None);
        assert_eq!(
            store
                .redeem_refresh_token(&Uuid::new_v4().to_string())
                .unwrap(),
            None
        );
    }

    #[test]
    fn expired_refresh_token_is_dropped() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let token = Uuid::new_v4().to_string();
        let stale = RefreshGrant {
            user_id: "user-1".to_string(),
            issued_at: (Utc::now() - Duration::seconds(REFRESH_TOKEN_TTL_SECS + 60)).to_rfc3339(),
        };
        FileStore::write_json(&store.token_path(&token), &stale).unwrap();

        assert_eq!(store.redeem_refresh_token(&token).unwrap(), None);
        assert!(!store.token_path(&token).exists());
    }
}
