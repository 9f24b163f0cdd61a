//! recipebook-http - Gateways for the recipe book REST service.
//!
//! [`HttpRecordGateway`] and [`HttpSessionGateway`] implement the core
//! gateway traits on top of a shared `reqwest` client. Record calls read the
//! bearer token from a [`SessionContext`](recipebook_core::SessionContext);
//! session calls are unauthenticated.

mod client;
mod endpoints;
mod records;
mod session;

pub use records::HttpRecordGateway;
pub use session::HttpSessionGateway;
