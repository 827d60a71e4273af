//! Resilient, caching access to a hosted work-management workspace.
//!
//! Boards, items and columns are addressed by name. Lookups are cached for
//! the lifetime of a `WorkspaceAccess`, every remote call runs under a
//! bounded fixed-interval retry, and column writes are encoded according to
//! the column's declared type.

pub mod access;
pub mod cache;
pub mod cli;
pub mod column;
pub mod config;
pub mod monday;
pub mod retry;

pub use access::WorkspaceAccess;
pub use config::Config;
pub use monday::api::WorkspaceApi;
pub use monday::sandbox::SandboxWorkspace;
pub use retry::{Retrier, RetryPolicy};
