//! Authentication module
//!
//! Provides JWT session tokens, the session guard, the role gate, and
//! argon2/bcrypt password verification.

mod jwt;
mod middleware;
mod password;
mod roles;

pub use jwt::{Claims, JwtKeys, JwtService, TokenError, MAX_TOKEN_TTL_SECS};
pub use middleware::{authenticate, extract_token, session_guard, AuthUser};
pub use password::PasswordService;
pub use roles::{enforce_roles, RoleGate};
