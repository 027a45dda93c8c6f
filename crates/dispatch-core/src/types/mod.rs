//! Core type definitions used across the Dispatch workspace.

pub mod actor;
pub mod response;

pub use actor::{ActorKey, ActorRole, parse_actor_id};
pub use response::ApiErrorResponse;
