//! Credential verification
//!
//! The guard only needs a yes/no answer, so verification sits behind a
//! one-method trait. `CredentialTable` answers from Argon2 password hashes
//! kept in memory; a remote check can replace it later.

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{debug, instrument};

use crate::config::AccountConfig;
use crate::error::{Error, Result};

/// Accounts available when no accounts are configured
pub const DEMO_ACCOUNTS: &[(&str, &str)] = &[
    ("admin", "admin123"),
    ("usuario", "user123"),
    ("techsolutions", "tech2024"),
];

pub trait CredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> bool;
}

impl<F> CredentialVerifier for F
where
    F: Fn(&str, &str) -> bool,
{
    fn verify(&self, username: &str, password: &str) -> bool {
        self(username, password)
    }
}

/// Hash a password into an Argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Credential(format!("failed to hash password: {e}")))
}

/// Username to password-hash table
#[derive(Debug, Default, Clone)]
pub struct CredentialTable {
    hashes: HashMap<String, String>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured accounts, or the demo accounts when none are given
    #[instrument(skip(accounts), fields(configured = accounts.len()))]
    pub fn from_accounts(accounts: &[AccountConfig]) -> Result<Self> {
        if accounts.is_empty() {
            debug!("No accounts configured, using demo accounts");
            return Self::demo();
        }
        let mut table = Self::new();
        for account in accounts {
            table.insert_hash(account.username.trim(), &account.password_hash)?;
        }
        Ok(table)
    }

    pub fn demo() -> Result<Self> {
        let mut table = Self::new();
        for (username, password) in DEMO_ACCOUNTS {
            table.insert_password(username, password)?;
        }
        Ok(table)
    }

    /// Add an account from an existing PHC string
    pub fn insert_hash(&mut self, username: &str, phc: &str) -> Result<()> {
        PasswordHash::new(phc).map_err(|e| {
            Error::Credential(format!("invalid password hash for {username}: {e}"))
        })?;
        self.hashes.insert(username.to_string(), phc.to_string());
        Ok(())
    }

    /// Add an account, hashing the plaintext password
    pub fn insert_password(&mut self, username: &str, password: &str) -> Result<()> {
        let phc = hash_password(password)?;
        self.hashes.insert(username.to_string(), phc);
        Ok(())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.hashes.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl CredentialVerifier for CredentialTable {
    fn verify(&self, username: &str, password: &str) -> bool {
        let Some(phc) = self.hashes.get(username) else {
            return false;
        };
        match PasswordHash::new(phc) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
