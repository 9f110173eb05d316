//! Data access layer
//!
//! Identities live in an in-memory registry loaded at startup.

pub mod identity;

pub use identity::{Identity, IdentityStore, StoreError, DEMO_PASSWORD};
