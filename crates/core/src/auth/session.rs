//! Session record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthPolicy;
use crate::storage::Scope;

/// Proof of a successful login, stored client-side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub login_time: DateTime<Utc>,
    pub remember: bool,
}

impl Session {
    pub fn new(username: impl Into<String>, login_time: DateTime<Utc>, remember: bool) -> Self {
        Self {
            username: username.into(),
            login_time,
            remember,
        }
    }

    /// Remembered sessions outlive the application run
    pub fn scope(&self) -> Scope {
        if self.remember {
            Scope::Durable
        } else {
            Scope::Session
        }
    }

    pub fn expires_at(&self, policy: &AuthPolicy) -> DateTime<Utc> {
        self.login_time + policy.session_ttl(self.remember)
    }

    /// Valid while strictly less than the TTL has elapsed
    pub fn is_valid_at(&self, now: DateTime<Utc>, policy: &AuthPolicy) -> bool {
        now.signed_duration_since(self.login_time) < policy.session_ttl(self.remember)
    }
}

/// Result of looking for a stored session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Absent,
    Valid(Session),
    /// A session was found past its lifetime and has been removed
    Expired,
}

impl SessionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionStatus::Valid(session) => Some(session),
            _ => None,
        }
    }
}

/// What to do with a still-valid session found at login time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChoice {
    Continue,
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn validity_boundary_is_exclusive() {
        let policy = AuthPolicy::default();
        let t0 = Utc::now();
        let session = Session::new("admin", t0, false);

        assert!(session.is_valid_at(t0 + Duration::hours(8) - Duration::milliseconds(1), &policy));
        assert!(!session.is_valid_at(t0 + Duration::hours(8), &policy));
        assert_eq!(session.expires_at(&policy), t0 + Duration::hours(8));
    }

    #[test]
    fn remembered_sessions_last_thirty_days() {
        let policy = AuthPolicy::default();
        let t0 = Utc::now();
        let session = Session::new("admin", t0, true);

        assert!(session.is_valid_at(t0 + Duration::days(29), &policy));
        assert!(!session.is_valid_at(t0 + Duration::days(30), &policy));
        assert_eq!(session.scope(), Scope::Durable);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let raw = r#"{"username":"admin","loginTime":"2024-06-01T10:00:00.000Z","remember":false}"#;
        let session: Session = serde_json::from_str(raw).unwrap();
        assert_eq!(session.username, "admin");
        assert_eq!(session.scope(), Scope::Session);

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"loginTime\""));
    }
}
