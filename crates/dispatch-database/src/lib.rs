//! # dispatch-database
//!
//! PostgreSQL connection pool and the credential repository that backs
//! stable signing secrets when single-login mode is disabled.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::credential::CredentialRepository;
