//! Well-known storage keys

/// JSON session record (session or durable scope)
pub const USER_SESSION: &str = "userSession";

/// Consecutive failed logins, integer string (durable)
pub const LOGIN_ATTEMPTS: &str = "loginAttempts";

/// Lockout deadline, epoch millis string (durable)
pub const LOCKOUT_TIME: &str = "lockoutTime";

/// JSON array of services (durable)
pub const SERVICES: &str = "techsolutions_services";

/// JSON array of contract requests (durable)
pub const SERVICE_CONTRACTS: &str = "service_contracts";
