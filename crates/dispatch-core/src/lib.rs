//! # dispatch-core
//!
//! Core crate for the Dispatch platform. Contains the actor identity types
//! shared by tokens and realtime connections, the collaborator traits
//! (TTL cache, credential store), configuration schemas, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Dispatch crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
