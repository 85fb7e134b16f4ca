//! Login gate with attempt counting, lockout and session expiry
//!
//! The guard keeps the lockout state in memory and writes it through to
//! durable storage before adopting a new state. Sessions are not cached:
//! every check reads storage, so a logout elsewhere is seen immediately.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

use super::credentials::CredentialVerifier;
use super::lockout::{remaining_seconds, LockoutState};
use super::session::{Session, SessionChoice, SessionStatus};
use crate::clock::Clock;
use crate::config::AuthPolicy;
use crate::error::{Error, LoginError, Result};
use crate::invariants::assert_lockout_invariants;
use crate::storage::{keys, KeyValueStore, Scope};

pub struct SessionGuard<'a, S: KeyValueStore + ?Sized> {
    storage: &'a S,
    verifier: &'a dyn CredentialVerifier,
    clock: &'a dyn Clock,
    policy: AuthPolicy,
    lockout: LockoutState,
}

impl<'a, S: KeyValueStore + ?Sized> SessionGuard<'a, S> {
    /// Load the persisted lockout state, dropping it if it already ran out
    #[instrument(skip_all)]
    pub fn open(
        storage: &'a S,
        verifier: &'a dyn CredentialVerifier,
        clock: &'a dyn Clock,
        policy: AuthPolicy,
    ) -> Result<Self> {
        let lockout = LockoutState::load(storage)?;
        let mut guard = Self {
            storage,
            verifier,
            clock,
            policy,
            lockout,
        };
        let now = guard.clock.now();
        guard.expire_lockout(now)?;
        debug!(failures = guard.lockout.failure_count, "Guard ready");
        Ok(guard)
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    #[instrument(skip(self, username, password), fields(username = %username.trim()))]
    pub fn attempt_login(
        &mut self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> std::result::Result<Session, LoginError> {
        let now = self.clock.now();
        self.expire_lockout(now)?;

        if let Some(remaining) = self.lockout.remaining(now) {
            warn!("Login rejected, guard is locked");
            return Err(LoginError::LockedOut {
                remaining_seconds: remaining_seconds(remaining),
            });
        }

        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::InvalidInput);
        }

        if self.verifier.verify(username, password) {
            // Counter reset precedes the session write
            self.commit_lockout(LockoutState::default())?;
            let session = Session::new(username, now, remember);
            self.store_session(&session)?;
            info!(remember, "Login succeeded");
            return Ok(session);
        }

        let next = self.lockout.after_failure(now, &self.policy);
        self.commit_lockout(next)?;

        match next.remaining(now) {
            Some(remaining) => {
                warn!(
                    failures = next.failure_count,
                    lockout_secs = self.policy.lockout_secs,
                    "Too many failed logins, locking"
                );
                Err(LoginError::LockedOut {
                    remaining_seconds: remaining_seconds(remaining),
                })
            }
            None => {
                let attempts_remaining = next.attempts_remaining(&self.policy);
                info!(failures = next.failure_count, attempts_remaining, "Login failed");
                Err(LoginError::InvalidCredentials { attempts_remaining })
            }
        }
    }

    /// Look up the stored session, clearing it if it has expired
    pub fn check_session(&self) -> Result<SessionStatus> {
        let Some(session) = self.load_session()? else {
            return Ok(SessionStatus::Absent);
        };

        if session.is_valid_at(self.clock.now(), &self.policy) {
            Ok(SessionStatus::Valid(session))
        } else {
            self.clear_session()?;
            info!(username = %session.username, "Session expired");
            Ok(SessionStatus::Expired)
        }
    }

    /// Apply the caller's decision about a session that is still valid
    pub fn resolve_existing_session(&self, choice: SessionChoice) -> Result<SessionStatus> {
        let status = self.check_session()?;
        match (status, choice) {
            (SessionStatus::Valid(session), SessionChoice::Discard) => {
                self.clear_session()?;
                info!(username = %session.username, "Existing session discarded");
                Ok(SessionStatus::Absent)
            }
            (status, _) => Ok(status),
        }
    }

    /// The active session, or `Unauthenticated`
    pub fn require_session(&self) -> Result<Session> {
        match self.check_session()? {
            SessionStatus::Valid(session) => Ok(session),
            SessionStatus::Expired => Err(Error::Unauthenticated(
                "session has expired, please log in again".to_string(),
            )),
            SessionStatus::Absent => Err(Error::Unauthenticated("no active session".to_string())),
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.clear_session()?;
        info!("Logged out");
        Ok(())
    }

    pub fn is_locked_out(&self) -> bool {
        self.lockout.is_locked(self.clock.now())
    }

    /// Consecutive failures; an expired lockout counts as zero
    pub fn failure_count(&self) -> u32 {
        if self.lockout.is_expired(self.clock.now()) {
            0
        } else {
            self.lockout.failure_count
        }
    }

    pub fn lockout_until(&self) -> Option<DateTime<Utc>> {
        self.lockout.lockout_until
    }

    pub fn remaining_lockout(&self) -> Option<Duration> {
        self.lockout.remaining(self.clock.now())
    }

    /// Forget all failures and any lockout
    pub fn reset_attempts(&mut self) -> Result<()> {
        self.commit_lockout(LockoutState::default())?;
        info!("Login attempts reset");
        Ok(())
    }

    fn expire_lockout(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.lockout.is_expired(now) {
            self.commit_lockout(LockoutState::default())?;
            info!("Lockout expired");
        }
        Ok(())
    }

    /// Persist first, then adopt; a failed write leaves the old state
    fn commit_lockout(&mut self, next: LockoutState) -> Result<()> {
        if next == self.lockout {
            return Ok(());
        }
        assert_lockout_invariants(&next, &self.policy);
        next.save(self.storage)?;
        self.lockout = next;
        Ok(())
    }

    /// Write the session and drop any copy in the other scope. If the second
    /// step fails the new session is taken back out.
    fn store_session(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        let scope = session.scope();
        self.storage.set(scope, keys::USER_SESSION, &json)?;

        let other = match scope {
            Scope::Session => Scope::Durable,
            Scope::Durable => Scope::Session,
        };
        if let Err(e) = self.storage.remove(other, keys::USER_SESSION) {
            if let Err(undo) = self.storage.remove(scope, keys::USER_SESSION) {
                warn!(%scope, error = %undo, "Could not withdraw half-stored session");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Durable scope wins over session scope
    fn load_session(&self) -> Result<Option<Session>> {
        for scope in [Scope::Durable, Scope::Session] {
            let Some(raw) = self.storage.get(scope, keys::USER_SESSION)? else {
                continue;
            };
            match serde_json::from_str::<Session>(&raw) {
                Ok(session) => return Ok(Some(session)),
                Err(e) => {
                    warn!(%scope, error = %e, "Discarding unreadable session");
                    self.storage.remove(scope, keys::USER_SESSION)?;
                }
            }
        }
        Ok(None)
    }

    fn clear_session(&self) -> Result<()> {
        self.storage.remove(Scope::Durable, keys::USER_SESSION)?;
        self.storage.remove(Scope::Session, keys::USER_SESSION)
    }
}
