//! Configuration file schema and loader
//!
//! Read from `config.toml` in the data directory. Every field is optional;
//! a missing file yields the defaults below.
//!
//! ```toml
//! [auth]
//! max_attempts = 3
//! lockout_secs = 300
//!
//! [[accounts]]
//! username = "admin"
//! password_hash = "$argon2id$v=19$..."
//! ```

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Longest accepted lockout or session lifetime: ten years
pub const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthPolicy,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Login accounts; empty means the built-in demo accounts
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// Lockout and session lifetime rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPolicy {
    /// Consecutive failures that trigger a lockout
    pub max_attempts: u32,
    pub lockout_secs: u64,
    /// Lifetime of a session created without "remember me"
    pub session_ttl_secs: u64,
    pub remembered_session_ttl_secs: u64,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_secs: 5 * 60,
            session_ttl_secs: 8 * 60 * 60,
            remembered_session_ttl_secs: 30 * 24 * 60 * 60,
        }
    }
}

impl AuthPolicy {
    pub fn lockout_duration(&self) -> Duration {
        seconds(self.lockout_secs)
    }

    pub fn session_ttl(&self, remember: bool) -> Duration {
        if remember {
            seconds(self.remembered_session_ttl_secs)
        } else {
            seconds(self.session_ttl_secs)
        }
    }
}

fn seconds(secs: u64) -> Duration {
    // Bounded so `DateTime` arithmetic cannot overflow
    Duration::seconds(secs.min(MAX_DURATION_SECS) as i64)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; defaults to `techsolutions.db` in the data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from a file, or fall back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.auth.max_attempts == 0 {
            return Err(Error::InvalidInput(
                "auth.max_attempts must be at least 1".to_string(),
            ));
        }
        for (name, secs) in [
            ("auth.lockout_secs", self.auth.lockout_secs),
            ("auth.session_ttl_secs", self.auth.session_ttl_secs),
            (
                "auth.remembered_session_ttl_secs",
                self.auth.remembered_session_ttl_secs,
            ),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(Error::InvalidInput(format!(
                    "{name} must be at most {MAX_DURATION_SECS}"
                )));
            }
        }
        if let Some(index) = self
            .accounts
            .iter()
            .position(|a| a.username.trim().is_empty())
        {
            return Err(Error::InvalidInput(format!(
                "accounts[{index}] has an empty username"
            )));
        }
        Ok(())
    }
}
