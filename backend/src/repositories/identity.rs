//! Identity registry (the credential store)
//!
//! A fixed, read-only set of identities loaded at startup. Lookups are by
//! id or by email; emails compare case-insensitively.

use crate::auth::PasswordService;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use college_admin_shared::{Role, User};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Password used by the demo registry
pub const DEMO_PASSWORD: &str = "password123";

/// Identity record, including its password credential
#[derive(Clone, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Identity {
    /// The identity as exposed over the API, without its credential
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Registry construction errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate identity id: {0}")]
    DuplicateId(String),

    #[error("duplicate identity email: {0}")]
    DuplicateEmail(String),
}

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    identities: Vec<Identity>,
}

/// Read-only identity registry
#[derive(Debug)]
pub struct IdentityStore {
    identities: Vec<Identity>,
    by_email: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl IdentityStore {
    /// Build a registry, rejecting duplicate ids and emails
    pub fn new(identities: Vec<Identity>) -> Result<Self, StoreError> {
        let mut by_email = HashMap::with_capacity(identities.len());
        let mut by_id = HashMap::with_capacity(identities.len());

        for (idx, identity) in identities.iter().enumerate() {
            if by_id.insert(identity.id.clone(), idx).is_some() {
                return Err(StoreError::DuplicateId(identity.id.clone()));
            }
            if by_email.insert(identity.email.to_lowercase(), idx).is_some() {
                return Err(StoreError::DuplicateEmail(identity.email.clone()));
            }
        }

        Ok(Self {
            identities,
            by_email,
            by_id,
        })
    }

    /// Parse a registry from TOML `[[identities]]` tables
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let seed: SeedFile = toml::from_str(source).context("Invalid identity seed file")?;
        Ok(Self::new(seed.identities)?)
    }

    /// Load a registry from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read identity seed file {}", path.display()))?;
        Self::from_toml_str(&source)
    }

    /// The three demo accounts, all using [`DEMO_PASSWORD`]
    ///
    /// Hashes are computed here, so this is CPU-intensive.
    pub fn demo() -> Result<Self> {
        let accounts = [
            ("1", "Admin User", "admin@example.com", Role::Admin, "2023-01-15T08:30:00Z", "2023-08-20T14:20:00Z"),
            ("2", "Faculty Member", "faculty@example.com", Role::Faculty, "2023-02-10T09:45:00Z", "2023-07-15T11:30:00Z"),
            ("3", "Student User", "student@example.com", Role::Student, "2023-03-20T10:15:00Z", "2023-06-25T16:40:00Z"),
        ];

        let mut identities = Vec::with_capacity(accounts.len());
        for (id, name, email, role, created_at, updated_at) in accounts {
            identities.push(Identity {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                password_hash: PasswordService::hash(DEMO_PASSWORD)?,
                avatar: None,
                created_at: created_at.parse()?,
                updated_at: updated_at.parse()?,
            });
        }

        Ok(Self::new(identities)?)
    }

    /// Find an identity by email, ignoring case
    pub fn find_by_email(&self, email: &str) -> Option<&Identity> {
        self.by_email
            .get(&email.to_lowercase())
            .map(|&idx| &self.identities[idx])
    }

    /// Find an identity by id
    pub fn find_by_id(&self, id: &str) -> Option<&Identity> {
        self.by_id.get(id).map(|&idx| &self.identities[idx])
    }

    /// All identities in registration order
    pub fn list(&self) -> &[Identity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, email: &str, role: Role) -> Identity {
        Identity {
            id: id.to_string(),
            name: format!("User {}", id),
            email: email.to_string(),
            role,
            password_hash: "$argon2id$placeholder".to_string(),
            avatar: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_lookup_by_email_ignores_case() {
        let store = IdentityStore::new(vec![identity("1", "Admin@Example.com", Role::Admin)]).unwrap();

        assert_eq!(store.find_by_email("admin@example.com").unwrap().id, "1");
        assert_eq!(store.find_by_email("ADMIN@EXAMPLE.COM").unwrap().id, "1");
        assert!(store.find_by_email("other@example.com").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let store = IdentityStore::new(vec![
            identity("1", "a@example.com", Role::Admin),
            identity("2", "b@example.com", Role::Student),
        ])
        .unwrap();

        assert_eq!(store.find_by_id("2").unwrap().role, Role::Student);
        assert!(store.find_by_id("3").is_none());
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_seed_without_identities_is_empty() {
        let store = IdentityStore::from_toml_str("").unwrap();
        assert!(store.is_empty());
        assert!(store.find_by_email("admin@example.com").is_none());
    }

    #[test]
    fn test_duplicates_rejected() {
        let dup_id = IdentityStore::new(vec![
            identity("1", "a@example.com", Role::Admin),
            identity("1", "b@example.com", Role::Admin),
        ]);
        assert_eq!(dup_id.unwrap_err(), StoreError::DuplicateId("1".to_string()));

        let dup_email = IdentityStore::new(vec![
            identity("1", "a@example.com", Role::Admin),
            identity("2", "A@example.com", Role::Student),
        ]);
        assert_eq!(
            dup_email.unwrap_err(),
            StoreError::DuplicateEmail("A@example.com".to_string())
        );
    }

    #[test]
    fn test_parse_seed_file() {
        let source = r#"
            [[identities]]
            id = "10"
            name = "Registrar"
            email = "registrar@college.edu"
            role = "admin"
            password_hash = "$2b$04$abcdefghijklmnopqrstuu5Ys2OWbeFOZVlGLkJ9.jsvgr5bXQQce"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-02T00:00:00Z"

            [[identities]]
            id = "11"
            name = "Lecturer"
            email = "lecturer@college.edu"
            role = "faculty"
            password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA"
            avatar = "https://college.edu/avatars/11.png"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-01T00:00:00Z"
        "#;

        let store = IdentityStore::from_toml_str(source).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].id, "10");

        let lecturer = store.find_by_email("Lecturer@College.edu").unwrap();
        assert_eq!(lecturer.role, Role::Faculty);
        assert_eq!(lecturer.avatar.as_deref(), Some("https://college.edu/avatars/11.png"));
    }

    #[test]
    fn test_seed_file_with_unknown_role_rejected() {
        let source = r#"
            [[identities]]
            id = "1"
            name = "Root"
            email = "root@college.edu"
            role = "superuser"
            password_hash = "x"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-01T00:00:00Z"
        "#;

        assert!(IdentityStore::from_toml_str(source).is_err());
    }

    #[test]
    fn test_demo_registry() {
        let store = IdentityStore::demo().unwrap();
        assert_eq!(store.len(), 3);

        let admin = store.find_by_email("admin@example.com").unwrap();
        assert_eq!(admin.id, "1");
        assert_eq!(admin.role, Role::Admin);
        assert!(PasswordService::verify(DEMO_PASSWORD, &admin.password_hash).unwrap());
        assert!(!PasswordService::verify("wrong", &admin.password_hash).unwrap());

        assert_eq!(store.find_by_id("2").unwrap().role, Role::Faculty);
        assert_eq!(store.find_by_id("3").unwrap().role, Role::Student);
    }

    #[test]
    fn test_to_user_drops_credential() {
        let identity = identity("1", "a@example.com", Role::Admin);
        let json = serde_json::to_value(identity.to_user()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["_id"], "1");
    }

    #[test]
    fn test_debug_hides_credential() {
        let identity = identity("1", "a@example.com", Role::Admin);
        assert!(!format!("{:?}", identity).contains("placeholder"));
    }
}
