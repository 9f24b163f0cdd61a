//! File-backed record gateway.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, instrument};

use recipebook_core::traits::RecordGateway;
use recipebook_core::{AuthSnapshot, PageRequest, PageResult, Recipe, RecordId, Result, SessionContext};

use crate::session::validate_token;
use crate::store::{FileStore, LocalAccount};

/// Recipe CRUD against a [`FileStore`], scoped to the signed-in account.
#[derive(Debug, Clone)]
pub struct FileRecordGateway {
    store: FileStore,
    session: SessionContext,
}

impl FileRecordGateway {
    /// Create a gateway over the store rooted at `root`.
    pub fn new(root: impl AsRef<Path>, session: SessionContext) -> Self {
        Self {
            store: FileStore::new(root),
            session,
        }
    }

    /// Resolve the account for the current session.
    fn owner(&self) -> Result<(AuthSnapshot, LocalAccount)> {
        let snapshot = self.session.authorize()?;
        let account = validate_token(&self.store, snapshot.access_token())?;
        Ok((snapshot, account))
    }

    /// Reject a result produced for a session that has since been cleared.
    fn settle<T>(&self, snapshot: &AuthSnapshot, result: Result<T>) -> Result<T> {
        self.session.ensure_current(snapshot)?;
        result
    }
}

#[async_trait]
impl RecordGateway for FileRecordGateway {
    #[instrument(skip(self))]
    async fn list(&self, page_index: u32, page_size: u32) -> Result<PageResult<Recipe>> {
        let (snapshot, account) = self.owner()?;
        debug!(user = %account.id, "Listing recipes");

        let result = PageRequest::new(page_index, page_size)
            .and_then(|request| self.store.list_recipes(&account.id, request));
        self.settle(&snapshot, result)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &RecordId) -> Result<Recipe> {
        let (snapshot, account) = self.owner()?;
        debug!(user = %account.id, "Getting recipe");

        let result = self.store.get_recipe(&account.id, id);
        self.settle(&snapshot, result)
    }

    #[instrument(skip(self, recipe))]
    async fn create(&self, recipe: &Recipe) -> Result<Recipe> {
        let (snapshot, account) = self.owner()?;
        debug!(user = %account.id, "Creating recipe");

        let result = self.store.create_recipe(&account.id, recipe);
        self.settle(&snapshot, result)
    }

    #[instrument(skip(self, recipe))]
    async fn update(&self, id: &RecordId, recipe: &Recipe) -> Result<Recipe> {
        let (snapshot, account) = self.owner()?;
        debug!(user = %account.id, "Updating recipe");

        let result = self.store.update_recipe(&account.id, id, recipe);
        self.settle(&snapshot, result)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<()> {
        let (snapshot, account) = self.owner()?;
        debug!(user = %account.id, "Deleting recipe");

        let result = self.store.delete_recipe(&account.id, id);
        self.settle(&snapshot, result)
    }
}
