//! TechSolutions Core Library
//!
//! Login gate, service catalog and contract log for the TechSolutions
//! admin console, persisted through a scoped key-value store.

pub mod auth;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod contracts;
pub mod error;
pub mod invariants;
pub mod models;
pub mod storage;

pub use auth::{
    hash_password, remaining_seconds, CredentialTable, CredentialVerifier, LockoutState, Session,
    SessionChoice, SessionGuard, SessionStatus,
};
pub use catalog::{ServiceCatalog, RELATED_LIMIT};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AccountConfig, AuthPolicy, Config, StorageConfig, MAX_DURATION_SECS};
pub use contracts::ContractLog;
pub use error::{Error, LoginError, Result};
pub use models::*;
pub use storage::{Database, KeyValueStore, MemoryStore, Scope};
