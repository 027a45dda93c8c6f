//! Per-actor signing secrets.

pub mod generator;
pub mod store;

pub use store::{SecretStore, SigningSecret};
