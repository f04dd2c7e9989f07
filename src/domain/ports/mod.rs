//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth;
mod identity_repository;
mod relationship_manager;
mod relationship_repository;

pub use auth::{RefreshAuth, RefreshGrant, SessionAuth};
pub use identity_repository::{
    FixtureIdentityRepository, IdentityRepository, IdentityRepositoryError,
};
pub use relationship_manager::{DeleteConnectionOutcome, RelationshipManager, RespondOutcome};
pub use relationship_repository::{
    FixtureRelationshipRepository, RelationshipRepository, RelationshipRepositoryError,
};

#[cfg(test)]
pub use auth::{MockRefreshAuth, MockSessionAuth};
#[cfg(test)]
pub use identity_repository::MockIdentityRepository;
#[cfg(test)]
pub use relationship_manager::MockRelationshipManager;
#[cfg(test)]
pub use relationship_repository::MockRelationshipRepository;
