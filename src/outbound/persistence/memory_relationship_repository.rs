//! In-memory `RelationshipRepository` implementation.
//!
//! Requests and connections live in insertion-ordered vectors behind a
//! single mutex. Holding that one lock across each conditional insert is
//! what makes the duplicate check and the write a single atomic step, the
//! contract the port requires of every adapter.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{RelationshipRepository, RelationshipRepositoryError};
use crate::domain::{Connection, ConnectionRequest, PairKey, RequestStatus, UserId};

#[derive(Debug, Default)]
struct RelationshipState {
    requests: Vec<ConnectionRequest>,
    connections: Vec<Connection>,
}

/// Process-local implementation of the `RelationshipRepository` port.
#[derive(Debug, Default)]
pub struct MemoryRelationshipRepository {
    state: Mutex<RelationshipState>,
}

impl MemoryRelationshipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, RelationshipState>, RelationshipRepositoryError> {
        self.state.lock().map_err(poisoned)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> RelationshipRepositoryError {
    RelationshipRepositoryError::query("relationship store lock poisoned")
}

#[async_trait]
impl RelationshipRepository for MemoryRelationshipRepository {
    async fn insert_request(
        &self,
        request: &ConnectionRequest,
    ) -> Result<(), RelationshipRepositoryError> {
        let mut state = self.lock()?;
        // Ordered pair: a pending request in the reverse direction does not
        // block this one.
        let duplicate = state.requests.iter().any(|existing| {
            existing.status == RequestStatus::Pending
                && existing.sender_id == request.sender_id
                && existing.receiver_id == request.receiver_id
        });
        if duplicate {
            return Err(RelationshipRepositoryError::duplicate_request(
                request.sender_id.as_ref(),
                request.receiver_id.as_ref(),
            ));
        }
        let pair = request.pair();
        if state.connections.iter().any(|c| c.pair() == pair) {
            return Err(RelationshipRepositoryError::duplicate_connection(
                request.sender_id.as_ref(),
                request.receiver_id.as_ref(),
            ));
        }
        state.requests.push(request.clone());
        Ok(())
    }

    async fn find_request(
        &self,
        id: &Uuid,
    ) -> Result<Option<ConnectionRequest>, RelationshipRepositoryError> {
        let state = self.lock()?;
        Ok(state.requests.iter().find(|r| &r.id == id).cloned())
    }

    async fn pending_for_receiver(
        &self,
        receiver_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationshipRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending && &r.receiver_id == receiver_id)
            .cloned()
            .collect())
    }

    async fn accept_request(
        &self,
        id: &Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RelationshipRepositoryError> {
        let mut state = self.lock()?;
        match state
            .requests
            .iter_mut()
            .find(|r| &r.id == id && r.status == RequestStatus::Pending)
        {
            Some(request) => {
                request.status = RequestStatus::Accepted;
                request.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_request(&self, id: &Uuid) -> Result<bool, RelationshipRepositoryError> {
        let mut state = self.lock()?;
        let before = state.requests.len();
        state.requests.retain(|r| &r.id != id);
        Ok(state.requests.len() < before)
    }

    async fn delete_requests_between(
        &self,
        pair: &PairKey,
    ) -> Result<u64, RelationshipRepositoryError> {
        let mut state = self.lock()?;
        let before = state.requests.len();
        state.requests.retain(|r| !pair.matches_request(r));
        Ok((before - state.requests.len()) as u64)
    }

    async fn insert_connection(
        &self,
        connection: &Connection,
    ) -> Result<(), RelationshipRepositoryError> {
        let mut state = self.lock()?;
        let pair = connection.pair();
        if state.connections.iter().any(|c| c.pair() == pair) {
            return Err(RelationshipRepositoryError::duplicate_connection(
                connection.user_id_1.as_ref(),
                connection.user_id_2.as_ref(),
            ));
        }
        state.connections.push(connection.clone());
        Ok(())
    }

    async fn connections_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Connection>, RelationshipRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .connections
            .iter()
            .filter(|c| c.involves(user_id))
            .cloned()
            .collect())
    }

    async fn delete_connection(
        &self,
        id: &Uuid,
    ) -> Result<Option<Connection>, RelationshipRepositoryError> {
        let mut state = self.lock()?;
        match state.connections.iter().position(|c| &c.id == id) {
            Some(index) => Ok(Some(state.connections.remove(index))),
            None => Ok(None),
        }
    }
}
