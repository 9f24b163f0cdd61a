//! Service endpoint paths and request/response bodies.

use serde::{Deserialize, Serialize};

use recipebook_core::{RecordId, UserInfo};

// ============================================================================
// Endpoint Paths
// ============================================================================

pub const SIGN_IN: &str = "signin";

pub const SIGN_UP: &str = "signup";

pub const REFRESH: &str = "refresh";

pub const RECIPES: &str = "recipes";

/// Path of a single recipe.
pub fn recipe_path(id: &RecordId) -> String {
    format!("{}/{}", RECIPES, id.as_str())
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for signin.
#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from signin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_info: UserInfo,
}

/// Request body for signup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from refresh. The service only reissues the access token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Query parameters for the recipe listing.
#[derive(Debug, Serialize)]
pub struct ListRecipesQuery {
    pub page: u32,
    pub size: u32,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub debug_message: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<ApiValidationEntry>,
}

/// One rejected field in an error body.
#[derive(Debug, Deserialize)]
pub struct ApiValidationEntry {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Render the validation entries as "field: message" lines.
    pub fn field_messages(&self) -> Vec<String> {
        self.validation_errors
            .iter()
            .filter_map(|entry| match (&entry.field, &entry.message) {
                (Some(field), Some(message)) => Some(format!("{}: {}", field, message)),
                (None, Some(message)) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}
