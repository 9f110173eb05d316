//! Password hashing using argon2
//!
//! New hashes are Argon2id PHC strings. Verification also accepts bcrypt
//! hashes (`$2a$`, `$2b$`, `$2y$`) so registries exported from older systems
//! keep working.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. In async contexts use the
//! `_async` variants, which run on the blocking thread pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::OnceCell;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Stand-in hash for accounts that do not exist
static DUMMY_HASH: OnceCell<String> = OnceCell::new();

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` for a wrong password and `Err` when the stored
    /// hash cannot be parsed.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if BCRYPT_PREFIXES.iter().any(|p| hash.starts_with(p)) {
            return bcrypt::verify(password, hash)
                .map_err(|e| anyhow::anyhow!("Invalid bcrypt hash: {}", e));
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Spend a full verification on a throwaway hash (non-blocking)
    ///
    /// Always rejects. Used for unknown accounts so they take as long to
    /// refuse as a wrong password does.
    pub async fn verify_dummy_async(password: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || {
            let hash = DUMMY_HASH.get_or_try_init(|| Self::hash("no-account-matches"))?;
            Self::verify(&password, hash).map(|_| false)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}
