//! Repository implementations over the shared connection pool.

pub mod credential;
