//! Relationship lifecycle domain service.
//!
//! Implements the [`RelationshipManager`] driving port on top of the
//! repository ports. Duplicate prevention is delegated to the store's
//! conditional inserts so the check and the write are one atomic step;
//! this service translates the resulting port errors into the API error
//! taxonomy and performs profile enrichment as an explicit second query.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    DeleteConnectionOutcome, IdentityRepository, IdentityRepositoryError, RelationshipManager,
    RelationshipRepository, RelationshipRepositoryError, RespondOutcome,
};
use crate::domain::{
    Connection, ConnectionRequest, ConnectionView, Error, PendingRequestView, RequestStatus,
    UserId,
};

/// Conflict message shared by both duplicate-send cases.
const ALREADY_SENT_OR_CONNECTED: &str = "Request already sent or users are already connected.";
/// Conflict message for decisions on missing or non-pending requests.
const INVALID_OR_EXPIRED: &str = "Invalid or expired request.";

/// Domain service implementing the relationship lifecycle.
#[derive(Clone)]
pub struct RelationshipService {
    relationships: Arc<dyn RelationshipRepository>,
    identities: Arc<dyn IdentityRepository>,
    clock: Arc<dyn Clock>,
}

impl RelationshipService {
    /// Create a new service over the given stores and clock.
    pub fn new(
        relationships: Arc<dyn RelationshipRepository>,
        identities: Arc<dyn IdentityRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            relationships,
            identities,
            clock,
        }
    }

    fn map_store_error(error: RelationshipRepositoryError) -> Error {
        match error {
            RelationshipRepositoryError::Connection { message } => {
                Error::internal(format!("relationship store unavailable: {message}"))
            }
            RelationshipRepositoryError::Query { message } => {
                Error::internal(format!("relationship store error: {message}"))
            }
            // Duplicates are handled at the call sites that can see them;
            // anywhere else they indicate a store inconsistency.
            other => Error::internal(format!("unexpected relationship store conflict: {other}")),
        }
    }

    fn map_identity_error(error: IdentityRepositoryError) -> Error {
        match error {
            IdentityRepositoryError::Connection { message } => {
                Error::internal(format!("identity store unavailable: {message}"))
            }
            IdentityRepositoryError::Query { message } => {
                Error::internal(format!("identity store error: {message}"))
            }
        }
    }

    async fn profile_or_internal(
        &self,
        user_id: &UserId,
    ) -> Result<crate::domain::IdentityProfile, Error> {
        self.identities
            .find_profile(user_id)
            .await
            .map_err(Self::map_identity_error)?
            .ok_or_else(|| Error::internal(format!("referenced identity {user_id} is missing")))
    }

    async fn enrich_connection(&self, connection: Connection) -> Result<ConnectionView, Error> {
        let user_1 = self.profile_or_internal(&connection.user_id_1).await?;
        let user_2 = self.profile_or_internal(&connection.user_id_2).await?;
        Ok(ConnectionView {
            id: connection.id,
            user_1: user_1.into(),
            user_2: user_2.into(),
            created_at: connection.created_at,
        })
    }

    async fn enriched_connections_for(&self, user_id: &UserId) -> Result<Vec<ConnectionView>, Error> {
        let connections = self
            .relationships
            .connections_for_user(user_id)
            .await
            .map_err(Self::map_store_error)?;
        let mut views = Vec::with_capacity(connections.len());
        for connection in connections {
            views.push(self.enrich_connection(connection).await?);
        }
        Ok(views)
    }
}

#[async_trait]
impl RelationshipManager for RelationshipService {
    async fn send_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> Result<ConnectionRequest, Error> {
        let request =
            ConnectionRequest::pending(sender_id.clone(), receiver_id.clone(), self.clock.utc());
        match self.relationships.insert_request(&request).await {
            Ok(()) => {
                debug!(sender = %sender_id, receiver = %receiver_id, "connection request created");
                Ok(request)
            }
            Err(
                RelationshipRepositoryError::DuplicateRequest { .. }
                | RelationshipRepositoryError::DuplicateConnection { .. },
            ) => Err(Error::conflict(ALREADY_SENT_OR_CONNECTED).with_details(json!({
                "senderId": sender_id,
                "receiverId": receiver_id,
            }))),
            Err(other) => Err(Self::map_store_error(other)),
        }
    }

    async fn list_pending(&self, user_id: &UserId) -> Result<Vec<PendingRequestView>, Error> {
        let requests = self
            .relationships
            .pending_for_receiver(user_id)
            .await
            .map_err(Self::map_store_error)?;
        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            let sender = self.profile_or_internal(&request.sender_id).await?;
            views.push(PendingRequestView::new(request, sender));
        }
        Ok(views)
    }

    async fn respond(&self, request_id: &Uuid, decision: &str) -> Result<RespondOutcome, Error> {
        enum Decision {
            Accept,
            Reject,
        }
        let decision = match decision {
            "Accepted" => Decision::Accept,
            "Rejected" => Decision::Reject,
            _ => return Err(Error::invalid_request("Invalid response value.")),
        };

        let request = self
            .relationships
            .find_request(request_id)
            .await
            .map_err(Self::map_store_error)?;
        let request = match request {
            Some(request) if request.status == RequestStatus::Pending => request,
            _ => return Err(Error::conflict(INVALID_OR_EXPIRED)),
        };

        match decision {
            Decision::Accept => {
                let connection = Connection::new(
                    request.sender_id.clone(),
                    request.receiver_id.clone(),
                    self.clock.utc(),
                );
                match self.relationships.insert_connection(&connection).await {
                    Ok(()) => {}
                    // A racing accept already connected the pair; the loser
                    // observes the same failure as a stale request.
                    Err(RelationshipRepositoryError::DuplicateConnection { .. }) => {
                        return Err(Error::conflict(INVALID_OR_EXPIRED));
                    }
                    Err(other) => return Err(Self::map_store_error(other)),
                }
                let transitioned = self
                    .relationships
                    .accept_request(request_id, self.clock.utc())
                    .await
                    .map_err(Self::map_store_error)?;
                if !transitioned {
                    return Err(Error::conflict(INVALID_OR_EXPIRED));
                }
                debug!(request = %request_id, "connection request accepted");
                Ok(RespondOutcome {
                    message: "Request accepted.".to_owned(),
                    status: RequestStatus::Accepted,
                })
            }
            Decision::Reject => {
                let deleted = self
                    .relationships
                    .delete_request(request_id)
                    .await
                    .map_err(Self::map_store_error)?;
                if !deleted {
                    return Err(Error::conflict(INVALID_OR_EXPIRED));
                }
                debug!(request = %request_id, "connection request rejected and removed");
                Ok(RespondOutcome {
                    message: "Request rejected.".to_owned(),
                    status: RequestStatus::Rejected,
                })
            }
        }
    }

    async fn list_connections(&self, user_id: &UserId) -> Result<Vec<ConnectionView>, Error> {
        self.enriched_connections_for(user_id).await
    }

    async fn delete_connection(
        &self,
        connection_id: &Uuid,
    ) -> Result<DeleteConnectionOutcome, Error> {
        let Some(connection) = self
            .relationships
            .delete_connection(connection_id)
            .await
            .map_err(Self::map_store_error)?
        else {
            return Err(Error::not_found("Connection not found."));
        };

        let removed = self
            .relationships
            .delete_requests_between(&connection.pair())
            .await
            .map_err(Self::map_store_error)?;
        debug!(
            connection = %connection_id,
            cascaded = removed,
            "connection deleted with request cascade"
        );

        // The refreshed list is scoped to user_id_1 only; the other side's
        // view is not refreshed in this response.
        let connections = self
            .enriched_connections_for(&connection.user_id_1)
            .await?;
        Ok(DeleteConnectionOutcome {
            message: "Connection deleted successfully.".to_owned(),
            connections,
        })
    }
}
