//! Known users and their password hashes.

use bcrypt::{non_truncating_hash, HashParts};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// A user that may log in. The password is only ever kept as a bcrypt hash.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl Credential {
    /// Passwords bcrypt cannot take in full (72 bytes and up) never match.
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::non_truncating_verify(password, &self.password_hash).unwrap_or(false)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Lookup of credentials by username.
///
/// A missing user is an ordinary `None`, not an error.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<Credential>;
}

/// One entry of the credentials file.
///
/// Either `password_hash` (bcrypt) or `password` must be set. Plaintext
/// passwords are hashed when the store is built.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub username: String,
    pub role: String,
    #[serde(default, alias = "password_hash")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialEntry {
    pub fn with_password(username: &str, password: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            role: role.to_string(),
            password_hash: None,
            password: Some(password.to_string()),
        }
    }
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Duplicate username `{0}` in credential list")]
    DuplicateUsername(String),

    #[error("Credential `{0}` has neither a password nor a password hash")]
    MissingPassword(String),

    #[error("Failed to hash password for `{username}`: {source}")]
    Hashing {
        username: String,
        #[source]
        source: bcrypt::BcryptError,
    },

    #[error("Password hash for `{username}` is not a bcrypt hash: {source}")]
    InvalidHash {
        username: String,
        #[source]
        source: bcrypt::BcryptError,
    },

    #[error("Password hash for `{username}` has cost {found}, expected {expected}")]
    CostMismatch {
        username: String,
        expected: u32,
        found: u32,
    },

    #[error("Failed to read credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid credentials file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads a JSON array of [`CredentialEntry`] from disk.
pub fn read_credentials_file(path: &Path) -> Result<Vec<CredentialEntry>, CredentialError> {
    let raw = std::fs::read_to_string(path)?;
    let entries = serde_json::from_str(&raw)?;
    Ok(entries)
}

/// Credentials held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    /// Builds the store, hashing plaintext entries with the given bcrypt cost.
    ///
    /// Pre-hashed entries must use that same cost, so that every lookup costs
    /// as much as the decoy check for an unknown user.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CredentialEntry>,
        cost: u32,
    ) -> Result<Self, CredentialError> {
        let mut users = HashMap::new();
        for entry in entries {
            if users.contains_key(&entry.username) {
                return Err(CredentialError::DuplicateUsername(entry.username));
            }
            let password_hash = match (entry.password_hash, entry.password) {
                (Some(existing), _) => {
                    check_hash_cost(&entry.username, &existing, cost)?;
                    existing
                }
                (None, Some(plain)) => {
                    tracing::warn!(
                        username = %entry.username,
                        "credential supplied in plaintext, hashing at load time"
                    );
                    non_truncating_hash(plain, cost).map_err(|source| {
                        CredentialError::Hashing {
                            username: entry.username.clone(),
                            source,
                        }
                    })?
                }
                (None, None) => return Err(CredentialError::MissingPassword(entry.username)),
            };
            let credential = Credential {
                username: entry.username.clone(),
                password_hash,
                role: entry.role,
            };
            users.insert(entry.username, credential);
        }
        Ok(Self { users })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn check_hash_cost(
    username: &str,
    password_hash: &str,
    expected: u32,
) -> Result<(), CredentialError> {
    let parts: HashParts = password_hash.parse().map_err(|source| CredentialError::InvalidHash {
        username: username.to_string(),
        source,
    })?;
    if parts.get_cost() != expected {
        return Err(CredentialError::CostMismatch {
            username: username.to_string(),
            expected,
            found: parts.get_cost(),
        });
    }
    Ok(())
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, username: &str) -> Option<Credential> {
        self.users.get(username).cloned()
    }
}
