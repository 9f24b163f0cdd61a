//! Recipe records and pagination types.
//!
//! The operations on these types live behind
//! [`RecordGateway`](crate::RecordGateway).

mod page;
mod types;

pub use page::{PageRequest, PageResult};
pub use types::Recipe;
