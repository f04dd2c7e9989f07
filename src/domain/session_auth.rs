//! Session guard: resolves bearer access tokens to identities.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError, SessionAuth};
use crate::domain::token::{self, TokenSecret};
use crate::domain::{Error, Identity};

/// Domain service implementing the session guard.
///
/// Verification is read-only: the service checks the token against the
/// access secret, then resolves the embedded subject through the identity
/// port. Each failure carries a distinct message so clients can tell a
/// missing token from a stale one.
#[derive(Clone)]
pub struct SessionAuthService {
    identities: Arc<dyn IdentityRepository>,
    access_secret: TokenSecret,
    clock: Arc<dyn Clock>,
}

impl SessionAuthService {
    /// Create a new guard service.
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        access_secret: TokenSecret,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            access_secret,
            clock,
        }
    }

    fn map_identity_error(error: IdentityRepositoryError) -> Error {
        Error::internal(format!("identity store error: {error}"))
    }
}

#[async_trait]
impl SessionAuth for SessionAuthService {
    async fn authenticate(&self, bearer_token: Option<String>) -> Result<Identity, Error> {
        let Some(token) = bearer_token else {
            return Err(Error::unauthorized("No token, authorization denied"));
        };

        let claims = token::verify(&token, &self.access_secret, self.clock.utc()).map_err(
            |error| {
                debug!(%error, "access token verification failed");
                Error::unauthorized("Token is not valid")
            },
        )?;

        self.identities
            .find_by_id(&claims.subject)
            .await
            .map_err(Self::map_identity_error)?
            .ok_or_else(|| Error::unauthorized("User not found, authorization denied"))
    }
}
