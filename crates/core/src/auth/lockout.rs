//! Failed-login counter and timed lockout
//!
//! `Unlocked(n)` moves to `Unlocked(n + 1)` on each failure until the
//! maximum is reached, at which point `lockout_until` is set. An expired
//! lockout and any successful login both return to `Unlocked(0)`.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::config::AuthPolicy;
use crate::error::Result;
use crate::storage::parse::{format_epoch_millis, parse_counter, parse_epoch_millis};
use crate::storage::{keys, KeyValueStore, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockoutState {
    pub failure_count: u32,
    pub lockout_until: Option<DateTime<Utc>>,
}

impl LockoutState {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lockout_until.is_some_and(|until| now < until)
    }

    /// A lockout was set and its deadline has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.lockout_until.is_some_and(|until| now >= until)
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.lockout_until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }

    /// State after one more failed attempt
    pub fn after_failure(&self, now: DateTime<Utc>, policy: &AuthPolicy) -> Self {
        let failure_count = self.failure_count.saturating_add(1);
        let lockout_until =
            (failure_count >= policy.max_attempts).then(|| now + policy.lockout_duration());
        Self {
            failure_count,
            lockout_until,
        }
    }

    pub fn attempts_remaining(&self, policy: &AuthPolicy) -> u32 {
        policy.max_attempts.saturating_sub(self.failure_count)
    }

    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Result<Self> {
        let failure_count = match storage.get(Scope::Durable, keys::LOGIN_ATTEMPTS)? {
            Some(raw) => parse_counter(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Ignoring unreadable login attempt counter");
                0
            }),
            None => 0,
        };
        let lockout_until = match storage.get(Scope::Durable, keys::LOCKOUT_TIME)? {
            Some(raw) => {
                let parsed = parse_epoch_millis(&raw);
                if parsed.is_none() {
                    warn!(value = %raw, "Ignoring unreadable lockout deadline");
                }
                parsed
            }
            None => None,
        };
        Ok(Self {
            failure_count,
            lockout_until,
        })
    }

    /// Write both keys; a cleared state removes them
    pub fn save<S: KeyValueStore + ?Sized>(&self, storage: &S) -> Result<()> {
        match self.lockout_until {
            Some(until) => {
                storage.set(Scope::Durable, keys::LOCKOUT_TIME, &format_epoch_millis(until))?
            }
            None => storage.remove(Scope::Durable, keys::LOCKOUT_TIME)?,
        }
        if self.failure_count == 0 {
            storage.remove(Scope::Durable, keys::LOGIN_ATTEMPTS)
        } else {
            storage.set(
                Scope::Durable,
                keys::LOGIN_ATTEMPTS,
                &self.failure_count.to_string(),
            )
        }
    }
}

/// Whole seconds left, rounded up
pub fn remaining_seconds(remaining: Duration) -> u64 {
    let millis = remaining.num_milliseconds().max(0) as u64;
    millis.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn failures_below_max_do_not_lock() {
        let policy = AuthPolicy::default();
        let now = Utc::now();

        let once = LockoutState::default().after_failure(now, &policy);
        let twice = once.after_failure(now, &policy);

        assert_eq!(twice.failure_count, 2);
        assert!(twice.lockout_until.is_none());
        assert!(!twice.is_locked(now));
        assert_eq!(twice.attempts_remaining(&policy), 1);
    }

    #[test]
    fn max_failure_locks_for_duration() {
        let policy = AuthPolicy::default();
        let now = Utc::now();
        let state = LockoutState {
            failure_count: 2,
            lockout_until: None,
        }
        .after_failure(now, &policy);

        assert_eq!(state.lockout_until, Some(now + Duration::minutes(5)));
        assert!(state.is_locked(now + Duration::minutes(4)));
        assert!(!state.is_locked(now + Duration::minutes(5)));
        assert!(state.is_expired(now + Duration::minutes(5)));
    }

    #[test]
    fn remaining_rounds_up() {
        assert_eq!(remaining_seconds(Duration::milliseconds(1)), 1);
        assert_eq!(remaining_seconds(Duration::seconds(300)), 300);
        assert_eq!(remaining_seconds(Duration::milliseconds(-5)), 0);
    }

    #[test]
    fn save_and_load() {
        let store = MemoryStore::new();
        let until = DateTime::from_timestamp_millis(1_718_000_000_000).unwrap();
        let state = LockoutState {
            failure_count: 3,
            lockout_until: Some(until),
        };

        state.save(&store).unwrap();
        assert_eq!(
            store.get(Scope::Durable, keys::LOCKOUT_TIME).unwrap().as_deref(),
            Some("1718000000000")
        );
        assert_eq!(LockoutState::load(&store).unwrap(), state);

        LockoutState::default().save(&store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn garbage_values_load_as_unlocked() {
        let store = MemoryStore::new();
        store.set(Scope::Durable, keys::LOGIN_ATTEMPTS, "many").unwrap();
        store.set(Scope::Durable, keys::LOCKOUT_TIME, "later").unwrap();

        assert_eq!(LockoutState::load(&store).unwrap(), LockoutState::default());
    }
}
