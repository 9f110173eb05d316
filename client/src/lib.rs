//! College Admin Client
//!
//! Client-side session handling for the College Admin API: a typed HTTP
//! client, persistent token storage, and the session store UI code reads
//! `user`/`is_authenticated`/`is_loading` from.

pub mod api;
pub mod error;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ClientConfig};
pub use error::ClientError;
pub use session::{SessionState, SessionStore, LOGIN_FALLBACK_MESSAGE};
pub use storage::{FileStorage, MemoryStorage, TokenStorage, TOKEN_KEY};
