//! Record gateway trait.

use async_trait::async_trait;

use crate::recipe::{PageResult, Recipe};
use crate::types::RecordId;
use crate::Result;

/// Stateless CRUD facade over the recipe records store.
///
/// Implementations authenticate through the session context they were built
/// with; callers never pass tokens.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Fetch one page of the signed-in user's recipes, oldest first.
    async fn list(&self, page_index: u32, page_size: u32) -> Result<PageResult<Recipe>>;

    /// Fetch a single recipe.
    async fn get(&self, id: &RecordId) -> Result<Recipe>;

    /// Store a new recipe. Returns it with its assigned id and timestamp.
    async fn create(&self, recipe: &Recipe) -> Result<Recipe>;

    /// Replace the stored fields of an existing recipe.
    async fn update(&self, id: &RecordId, recipe: &Recipe) -> Result<Recipe>;

    /// Delete a recipe.
    async fn delete(&self, id: &RecordId) -> Result<()>;
}
