//! College Admin Shared Library
//!
//! This crate contains the wire types shared by the backend and the
//! client session library.

pub mod errors;
pub mod models;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use models::{Role, User};
pub use types::*;
