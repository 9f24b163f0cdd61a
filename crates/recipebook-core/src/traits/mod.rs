//! Contracts of the collaborators the orchestration layer depends on.

mod records;
mod session;
mod token_store;

pub use records::RecordGateway;
pub use session::SessionGateway;
pub use token_store::TokenStore;
