//! Refresh guard: validates refresh credentials and rotates access tokens.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    IdentityRepository, IdentityRepositoryError, RefreshAuth, RefreshGrant,
};
use crate::domain::token::{self, TokenSecret};
use crate::domain::Error;

/// Domain service implementing the refresh guard.
///
/// Beyond signature and expiry checks, the presented credential must exactly
/// match the identity's stored refresh slot; a rotated or revoked token
/// therefore stops working even while its signature is still valid. Only the
/// access token is reissued here, never the refresh token.
#[derive(Clone)]
pub struct RefreshAuthService {
    identities: Arc<dyn IdentityRepository>,
    refresh_secret: TokenSecret,
    access_secret: TokenSecret,
    access_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RefreshAuthService {
    /// Create a new guard service.
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        refresh_secret: TokenSecret,
        access_secret: TokenSecret,
        access_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            refresh_secret,
            access_secret,
            access_ttl,
            clock,
        }
    }

    fn map_identity_error(error: IdentityRepositoryError) -> Error {
        Error::internal(format!("identity store error: {error}"))
    }
}

#[async_trait]
impl RefreshAuth for RefreshAuthService {
    async fn refresh(&self, credential: Option<String>) -> Result<RefreshGrant, Error> {
        let Some(credential) = credential else {
            return Err(Error::forbidden("Refresh token not found"));
        };

        let claims = token::verify(&credential, &self.refresh_secret, self.clock.utc()).map_err(
            |error| {
                debug!(%error, "refresh token verification failed");
                Error::forbidden("Refresh token is not valid")
            },
        )?;

        let identity = self
            .identities
            .find_by_id(&claims.subject)
            .await
            .map_err(Self::map_identity_error)?;
        let identity = match identity {
            Some(identity)
                if identity.refresh_token.as_deref() == Some(credential.as_str()) =>
            {
                identity
            }
            _ => return Err(Error::forbidden("Invalid refresh token")),
        };

        let access_token =
            token::issue(&identity.id, &self.access_secret, self.access_ttl, self.clock.utc());
        Ok(RefreshGrant {
            identity,
            access_token,
        })
    }
}
