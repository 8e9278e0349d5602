//! Bearer token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{JwtAuth, TokenVerifier};
pub use models::{bearer_token, JwtClaims};
