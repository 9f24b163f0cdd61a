//! recipebook-core - Core recipe book types and traits.
//!
//! Everything the orchestration layer needs to know about its collaborators
//! lives here: the record and session gateway contracts, the token store, the
//! explicit [`SessionContext`] shared by authenticated gateways, and the
//! unified [`Error`] type.

pub mod credentials;
pub mod error;
pub mod recipe;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, Registration};
pub use error::Error;
pub use recipe::{PageRequest, PageResult, Recipe};
pub use session::{AuthSnapshot, SessionContext, SessionWriter};
pub use tokens::{AccessToken, RefreshToken, SessionTokens, UserInfo};
pub use traits::{RecordGateway, SessionGateway, TokenStore};
pub use types::{RecordId, ServiceUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
