//! Login gate: credentials, lockout and sessions

mod credentials;
mod guard;
mod lockout;
mod session;

pub use credentials::{hash_password, CredentialTable, CredentialVerifier, DEMO_ACCOUNTS};
pub use guard::SessionGuard;
pub use lockout::{remaining_seconds, LockoutState};
pub use session::{Session, SessionChoice, SessionStatus};
