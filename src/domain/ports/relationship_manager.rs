//! Driving port for the connection-request lifecycle.
//!
//! Inbound adapters call this port to run lifecycle operations without
//! knowing the backing stores, which keeps handler tests deterministic:
//! they substitute a test double instead of wiring persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ConnectionRequest, ConnectionView, Error, PendingRequestView, RequestStatus, UserId,
};

/// Result of responding to a connection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondOutcome {
    /// Confirmation message, e.g. `Request accepted.`.
    pub message: String,
    /// The decision that was applied.
    pub status: RequestStatus,
}

/// Result of deleting a connection.
///
/// The refreshed list is scoped to `user_id_1` of the deleted connection
/// only; the other side's view is not refreshed in the same response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConnectionOutcome {
    pub message: String,
    pub connections: Vec<ConnectionView>,
}

/// Domain use-case port for the relationship lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipManager: Send + Sync {
    /// Create a pending request from sender to receiver.
    ///
    /// Fails Conflict when a pending request with this exact ordering or a
    /// connection over the unordered pair already exists.
    async fn send_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> Result<ConnectionRequest, Error>;

    /// Pending requests addressed to the user, enriched with sender profiles.
    async fn list_pending(&self, user_id: &UserId) -> Result<Vec<PendingRequestView>, Error>;

    /// Apply an `Accepted` or `Rejected` decision to a pending request.
    async fn respond(&self, request_id: &Uuid, decision: &str) -> Result<RespondOutcome, Error>;

    /// Connections involving the user, enriched with both profiles.
    async fn list_connections(&self, user_id: &UserId) -> Result<Vec<ConnectionView>, Error>;

    /// Delete a connection and cascade-delete requests between the pair.
    async fn delete_connection(
        &self,
        connection_id: &Uuid,
    ) -> Result<DeleteConnectionOutcome, Error>;
}
