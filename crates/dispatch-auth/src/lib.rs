//! # dispatch-auth
//!
//! Session identity for the Dispatch platform: per-actor signing secrets
//! whose rotation revokes every token signed with the previous value, and
//! the token authority that issues and verifies HS256 bearer tokens.
//!
//! ## Modules
//!
//! - `secret`: resolves and rotates signing secrets
//! - `jwt`: claims, signing and verification
//! - `clients`: the collaborator set injected at startup
//! - `credential`: in-memory credential store for tests and local runs

pub mod clients;
pub mod credential;
pub mod error;
pub mod jwt;
pub mod secret;

pub use clients::ClientSet;
pub use credential::MemoryCredentialStore;
pub use error::{AuthError, TokenErrorKind};
pub use jwt::{Claims, DeviceContext, IssuedToken, TokenAuthority};
pub use secret::{SecretStore, SigningSecret};
