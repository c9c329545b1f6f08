//! Persistence for learnhub on top of sea-orm.
//!
//! [`Store`] owns the connection pool and exposes one async method per
//! operation. Writes that touch several tables (enrolling, approving a
//! request, deleting a user or course) run in a single transaction.

pub mod connect;
pub mod entity;
pub mod error;
pub mod password;
pub mod schema;
mod store;

pub use connect::{connect, in_memory_config};
pub use error::StoreError;
pub use password::Argon2Hasher;
pub use schema::{create_table_statements, create_tables};
pub use store::Store;
