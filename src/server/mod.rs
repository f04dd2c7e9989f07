//! Server wiring: assemble services and guards from settings.

pub mod settings;

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::{RefreshAuthService, RelationshipService, SessionAuthService};
use crate::inbound::http::state::HttpState;
use crate::middleware::{RefreshGuard, SessionGuard};
use crate::outbound::persistence::{MemoryIdentityRepository, MemoryRelationshipRepository};
use settings::Settings;

/// Wired application parts handed to the HTTP app factory.
#[derive(Clone)]
pub struct AppParts {
    pub http_state: HttpState,
    pub session_guard: SessionGuard,
    pub refresh_guard: RefreshGuard,
    /// Kept accessible so operators and tests can seed identities; the
    /// account subsystem that would normally populate it is out of scope.
    pub identities: Arc<MemoryIdentityRepository>,
}

/// Build the domain services and guards over in-memory persistence.
pub fn wire(settings: &Settings) -> AppParts {
    let identities = Arc::new(MemoryIdentityRepository::new());
    let relationships = Arc::new(MemoryRelationshipRepository::new());
    let clock = Arc::new(DefaultClock);

    let manager = Arc::new(RelationshipService::new(
        relationships,
        identities.clone(),
        clock.clone(),
    ));
    let session_auth = Arc::new(SessionAuthService::new(
        identities.clone(),
        settings.access_secret.clone(),
        clock.clone(),
    ));
    let refresh_auth = Arc::new(RefreshAuthService::new(
        identities.clone(),
        settings.refresh_secret.clone(),
        settings.access_secret.clone(),
        settings.access_ttl,
        clock,
    ));

    AppParts {
        http_state: HttpState::new(manager),
        session_guard: SessionGuard::new(session_auth),
        refresh_guard: RefreshGuard::new(refresh_auth, settings.cookie_secure),
        identities,
    }
}
