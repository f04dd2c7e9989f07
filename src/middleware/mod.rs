//! HTTP middleware guarding routes with the auth driving ports.

pub mod refresh_guard;
pub mod session_guard;

pub use refresh_guard::RefreshGuard;
pub use session_guard::{AuthenticatedIdentity, SessionGuard};
