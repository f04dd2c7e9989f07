//! Port for reading identities owned by the external account subsystem.

use async_trait::async_trait;

use crate::domain::{Identity, IdentityProfile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity repository adapters.
    pub enum IdentityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "identity repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "identity repository query failed: {message}",
    }
}

/// Read-only port over the identity store.
///
/// The core never writes identities; it resolves token subjects and fetches
/// display attributes for enrichment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Resolve an identity by id, including its stored refresh-token slot.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Fetch the display attributes for an identity.
    async fn find_profile(
        &self,
        id: &UserId,
    ) -> Result<Option<IdentityProfile>, IdentityRepositoryError>;
}

/// Fixture implementation for tests that do not exercise identity lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityRepository;

#[async_trait]
impl IdentityRepository for FixtureIdentityRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<Identity>, IdentityRepositoryError> {
        Ok(None)
    }

    async fn find_profile(
        &self,
        _id: &UserId,
    ) -> Result<Option<IdentityProfile>, IdentityRepositoryError> {
        Ok(None)
    }
}
