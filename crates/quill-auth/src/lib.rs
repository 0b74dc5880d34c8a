//! # quill-auth
//!
//! Authentication and authorization for Quill: JWT access/refresh token
//! encoding and validation, Argon2id password hashing, the session
//! manager implementing the cookie credential state machine, and the
//! ordered role gate.

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::PasswordHasher;
pub use rbac::RoleGate;
pub use session::{Resolution, SessionManager};
