//! Port for persisting connection requests and connections.
//!
//! The inserts are conditional: `insert_request` and `insert_connection`
//! perform the duplicate checks and the write as one atomic step, so two
//! interleaved calls cannot both pass a separate existence check before
//! either write lands. Adapters must hold whatever lock or constraint their
//! backend needs to honour that.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Connection, ConnectionRequest, PairKey, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by relationship repository adapters.
    pub enum RelationshipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "relationship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "relationship repository query failed: {message}",
        /// A pending request with the same ordered (sender, receiver) pair
        /// already exists.
        DuplicateRequest { sender_id: String, receiver_id: String } =>
            "a pending request from {sender_id} to {receiver_id} already exists",
        /// A connection over the same unordered pair already exists.
        DuplicateConnection { user_id_1: String, user_id_2: String } =>
            "a connection between {user_id_1} and {user_id_2} already exists",
    }
}

/// Persistence port for the relationship collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Insert a pending request if no duplicate exists.
    ///
    /// Fails `DuplicateRequest` when a `Pending` request with the same
    /// ordered (sender, receiver) pair exists, and `DuplicateConnection`
    /// when the unordered pair is already connected. A reverse-direction
    /// pending request is not a duplicate.
    async fn insert_request(
        &self,
        request: &ConnectionRequest,
    ) -> Result<(), RelationshipRepositoryError>;

    /// Fetch a request by id.
    async fn find_request(
        &self,
        id: &Uuid,
    ) -> Result<Option<ConnectionRequest>, RelationshipRepositoryError>;

    /// Pending requests addressed to the given receiver, in insertion order.
    async fn pending_for_receiver(
        &self,
        receiver_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationshipRepositoryError>;

    /// Transition a request from `Pending` to `Accepted`.
    ///
    /// Returns whether the transition happened; `false` means the request is
    /// missing or no longer pending, so a racing accept loses cleanly.
    async fn accept_request(
        &self,
        id: &Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RelationshipRepositoryError>;

    /// Delete a request by id, returning whether it existed.
    async fn delete_request(&self, id: &Uuid) -> Result<bool, RelationshipRepositoryError>;

    /// Delete every request between the pair, in both directions.
    ///
    /// Returns the number of requests removed.
    async fn delete_requests_between(
        &self,
        pair: &PairKey,
    ) -> Result<u64, RelationshipRepositoryError>;

    /// Insert a connection if the unordered pair is not already connected.
    async fn insert_connection(
        &self,
        connection: &Connection,
    ) -> Result<(), RelationshipRepositoryError>;

    /// Connections involving the given user on either side, in insertion
    /// order.
    async fn connections_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Connection>, RelationshipRepositoryError>;

    /// Delete a connection by id, returning the removed record when present.
    async fn delete_connection(
        &self,
        id: &Uuid,
    ) -> Result<Option<Connection>, RelationshipRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRelationshipRepository;

#[async_trait]
impl RelationshipRepository for FixtureRelationshipRepository {
    async fn insert_request(
        &self,
        _request: &ConnectionRequest,
    ) -> Result<(), RelationshipRepositoryError> {
        Ok(())
    }

    async fn find_request(
        &self,
        _id: &Uuid,
    ) -> Result<Option<ConnectionRequest>, RelationshipRepositoryError> {
        Ok(None)
    }

    async fn pending_for_receiver(
        &self,
        _receiver_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationshipRepositoryError> {
        Ok(Vec::new())
    }

    async fn accept_request(
        &self,
        _id: &Uuid,
        _updated_at: DateTime<Utc>,
    ) -> Result<bool, RelationshipRepositoryError> {
        Ok(false)
    }

    async fn delete_request(&self, _id: &Uuid) -> Result<bool, RelationshipRepositoryError> {
        Ok(false)
    }

    async fn delete_requests_between(
        &self,
        _pair: &PairKey,
    ) -> Result<u64, RelationshipRepositoryError> {
        Ok(0)
    }

    async fn insert_connection(
        &self,
        _connection: &Connection,
    ) -> Result<(), RelationshipRepositoryError> {
        Ok(())
    }

    async fn connections_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Connection>, RelationshipRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_connection(
        &self,
        _id: &Uuid,
    ) -> Result<Option<Connection>, RelationshipRepositoryError> {
        Ok(None)
    }
}
