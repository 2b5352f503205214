//! Dashboard access check against a small static user table.
//!
//! This is an illustrative gate, not credential handling: passwords are
//! stored as unsalted SHA-256 digests. Swap in another [`CredentialVerifier`]
//! to use a real service.

use crate::{AccessLevel, Error, Result};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// A user allowed into the dashboard
#[derive(Clone, Debug)]
pub struct UserRecord {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub access: AccessLevel,
}

/// Who is signed in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub display_name: String,
    pub access: AccessLevel,
}

/// Checks a username/password pair
pub trait CredentialVerifier {
    /// Returns the signed-in user, [`Error::NotFound`] for an unknown user,
    /// or [`Error::Authentication`] for a wrong password.
    fn verify(&self, username: &str, password: &str) -> Result<AuthenticatedUser>;
}

/// Hex-encoded SHA-256 digest of a password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory user table
#[derive(Clone, Debug, Default)]
pub struct StaticUserStore {
    users: Vec<UserRecord>,
}

static DEFAULT_USERS: Lazy<StaticUserStore> = Lazy::new(|| {
    StaticUserStore::new(vec![
        UserRecord {
            username: "agronomo1".into(),
            display_name: "Leonardo Peres".into(),
            password_hash: hash_password("Uniso123"),
            access: AccessLevel::Full,
        },
        UserRecord {
            username: "tecnico1".into(),
            display_name: "Técnico Oliveira".into(),
            password_hash: hash_password("plantio456"),
            access: AccessLevel::Limited,
        },
    ])
});

/// The built-in demo users
pub fn default_user_store() -> &'static StaticUserStore {
    &DEFAULT_USERS
}

impl StaticUserStore {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }
}

impl CredentialVerifier for StaticUserStore {
    fn verify(&self, username: &str, password: &str) -> Result<AuthenticatedUser> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username)
            .ok_or_else(|| Error::not_found("User", username))?;

        if hash_password(password) != user.password_hash {
            tracing::warn!(username, "Rejected login");
            return Err(Error::Authentication("incorrect password".into()));
        }

        tracing::debug!(username, "Login accepted");
        Ok(AuthenticatedUser {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            access: user.access,
        })
    }
}
