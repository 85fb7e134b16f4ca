//! Error types for TechSolutions Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a rejected login attempt
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Username and password are required")]
    InvalidInput,

    #[error("Invalid credentials, {attempts_remaining} attempts remaining")]
    InvalidCredentials { attempts_remaining: u32 },

    #[error("Too many failed attempts, locked for another {remaining_seconds}s")]
    LockedOut { remaining_seconds: u64 },

    #[error(transparent)]
    Storage(#[from] Error),
}
