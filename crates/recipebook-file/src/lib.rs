//! recipebook-file - Filesystem-backed recipe book gateways.
//!
//! A local stand-in for the REST service: accounts, recipes and refresh
//! tokens live as JSON documents under a root directory. Used for offline
//! work and in tests.

mod records;
mod session;
mod store;

pub use records::FileRecordGateway;
pub use session::FileSessionGateway;
pub use store::{FileStore, LocalAccount};
