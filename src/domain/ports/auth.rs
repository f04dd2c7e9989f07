//! Driving ports for the session and refresh guards.
//!
//! A guard maps a raw credential (possibly absent) to an authenticated
//! identity or a failure. The middlewares compose these sequentially and
//! short-circuit on the first failure; they never inspect tokens themselves.

use async_trait::async_trait;

use crate::domain::{Error, Identity};

/// Use-case port authenticating bearer access tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuth: Send + Sync {
    /// Resolve the bearer token from the `Authorization` header to an
    /// identity. `None` means the header was absent or not a bearer scheme.
    async fn authenticate(&self, bearer_token: Option<String>) -> Result<Identity, Error>;
}

/// Outcome of a successful refresh: the caller's identity plus a freshly
/// minted access token. The refresh token itself is not reissued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub identity: Identity,
    pub access_token: String,
}

/// Use-case port validating refresh credentials and rotating access tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshAuth: Send + Sync {
    /// Validate the refresh credential from the scoped cookie. `None` means
    /// the cookie was absent.
    async fn refresh(&self, credential: Option<String>) -> Result<RefreshGrant, Error>;
}
