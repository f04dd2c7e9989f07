//! In-memory `IdentityRepository` implementation.
//!
//! Identities live in the external account subsystem; this adapter mirrors
//! the subset the service reads into a process-local map. Seeding helpers
//! keep the auth record and the display profile in step.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{Identity, IdentityProfile, UserId};

#[derive(Debug, Default)]
struct IdentityState {
    identities: HashMap<UserId, Identity>,
    profiles: HashMap<UserId, IdentityProfile>,
}

/// Process-local implementation of the `IdentityRepository` port.
#[derive(Debug, Default)]
pub struct MemoryIdentityRepository {
    state: Mutex<IdentityState>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an identity under its id, replacing any previous record.
    pub fn seed_identity(&self, identity: Identity) -> Result<(), IdentityRepositoryError> {
        let mut state = self.lock()?;
        state.identities.insert(identity.id.clone(), identity);
        Ok(())
    }

    /// Store a display profile under its id, replacing any previous record.
    pub fn seed_profile(&self, profile: IdentityProfile) -> Result<(), IdentityRepositoryError> {
        let mut state = self.lock()?;
        state.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Overwrite the stored refresh-token slot for an identity.
    ///
    /// Returns `false` when no identity with that id exists.
    pub fn set_refresh_token(
        &self,
        id: &UserId,
        token: Option<String>,
    ) -> Result<bool, IdentityRepositoryError> {
        let mut state = self.lock()?;
        match state.identities.get_mut(id) {
            Some(identity) => {
                identity.refresh_token = token;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, IdentityState>, IdentityRepositoryError> {
        self.state.lock().map_err(poisoned)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> IdentityRepositoryError {
    IdentityRepositoryError::query("identity store lock poisoned")
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityRepositoryError> {
        let state = self.lock()?;
        Ok(state.identities.get(id).cloned())
    }

    async fn find_profile(
        &self,
        id: &UserId,
    ) -> Result<Option<IdentityProfile>, IdentityRepositoryError> {
        let state = self.lock()?;
        Ok(state.profiles.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).expect("valid id")
    }

    #[tokio::test]
    async fn find_by_id_returns_seeded_identity() {
        let repo = MemoryIdentityRepository::new();
        repo.seed_identity(Identity::new(user("u1")).with_refresh_token("tok"))
            .expect("seed ok");

        let found = repo.find_by_id(&user("u1")).await.expect("lookup ok");
        assert_eq!(found.and_then(|i| i.refresh_token).as_deref(), Some("tok"));
        assert_eq!(repo.find_by_id(&user("u2")).await, Ok(None));
    }

    #[tokio::test]
    async fn find_profile_returns_seeded_profile() {
        let repo = MemoryIdentityRepository::new();
        repo.seed_profile(IdentityProfile::new(user("u1"), "Ada", "Lovelace"))
            .expect("seed ok");

        let found = repo
            .find_profile(&user("u1"))
            .await
            .expect("lookup ok")
            .expect("present");
        assert_eq!(found.first_name, "Ada");
        assert_eq!(repo.find_profile(&user("u2")).await, Ok(None));
    }

    #[tokio::test]
    async fn set_refresh_token_overwrites_the_slot() {
        let repo = MemoryIdentityRepository::new();
        repo.seed_identity(Identity::new(user("u1")).with_refresh_token("old"))
            .expect("seed ok");

        assert_eq!(
            repo.set_refresh_token(&user("u1"), Some("new".into())),
            Ok(true)
        );
        let found = repo.find_by_id(&user("u1")).await.expect("lookup ok");
        assert_eq!(found.and_then(|i| i.refresh_token).as_deref(), Some("new"));

        assert_eq!(repo.set_refresh_token(&user("missing"), None), Ok(false));
    }
}
