//! Session plumbing for the shell: token persistence and backend selection.

mod backend;
mod storage;

pub use backend::{SessionBackend, record_gateway};
pub use storage::{FileTokenStore, stored_service};
