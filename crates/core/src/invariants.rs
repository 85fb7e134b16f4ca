//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::auth::LockoutState;
use crate::config::AuthPolicy;
use crate::models::Service;

/// Ids are unique and positive, quantities are at least one
pub fn assert_catalog_invariants(services: &[Service]) {
    if !cfg!(debug_assertions) {
        return;
    }

    let mut seen = HashSet::with_capacity(services.len());
    for service in services {
        debug_assert!(service.id >= 1, "Service {:?} has id 0", service.name);
        debug_assert!(
            seen.insert(service.id),
            "Service id {} appears more than once",
            service.id
        );
        debug_assert!(
            service.quantity >= 1,
            "Service {} has quantity 0",
            service.id
        );
    }
}

/// A lockout deadline only exists once the failure maximum is reached
pub fn assert_lockout_invariants(state: &LockoutState, policy: &AuthPolicy) {
    debug_assert!(
        state.lockout_until.is_none() || state.failure_count >= policy.max_attempts,
        "Lockout set after {} failures, maximum is {}",
        state.failure_count,
        policy.max_attempts
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewService;
    use chrono::Utc;

    #[test]
    fn test_valid_catalog() {
        let services = vec![
            Service::from_new(1, NewService::new("Web", 300)),
            Service::from_new(3, NewService::new("Mobile", 600)),
        ];
        assert_catalog_invariants(&services);
    }

    #[test]
    #[should_panic(expected = "more than once")]
    fn test_duplicate_ids() {
        let services = vec![
            Service::from_new(2, NewService::new("Web", 300)),
            Service::from_new(2, NewService::new("Mobile", 600)),
        ];
        assert_catalog_invariants(&services);
    }

    #[test]
    fn test_valid_lockout() {
        let policy = AuthPolicy::default();
        let state = LockoutState {
            failure_count: 3,
            lockout_until: Some(Utc::now()),
        };
        assert_lockout_invariants(&state, &policy);
    }

    #[test]
    #[should_panic(expected = "Lockout set after 1 failures")]
    fn test_early_lockout() {
        let state = LockoutState {
            failure_count: 1,
            lockout_until: Some(Utc::now()),
        };
        assert_lockout_invariants(&state, &AuthPolicy::default());
    }
}
