//! Bearer token claims, signing, verification, and the authority tying them
//! to per-actor secrets.

pub mod authority;
pub mod claims;
pub mod decoder;
pub mod encoder;

pub use authority::TokenAuthority;
pub use claims::{Claims, DeviceContext, IssuedToken};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
