//! Enriched read models returned by relationship queries.
//!
//! Enrichment is an explicit second step: the service fetches referenced
//! profiles by id after the primary query and embeds the display attributes
//! here. The JSON field names mirror the raw records (`senderId`, `userId1`,
//! `userId2`) with the id replaced by the populated card, which is the shape
//! API clients expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ConnectionRequest, IdentityProfile, RequestStatus, UserId};

/// Sender display attributes embedded in a pending-request view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SenderCard {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<IdentityProfile> for SenderCard {
    fn from(profile: IdentityProfile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            image: profile.image,
        }
    }
}

/// Participant display attributes embedded in a connection view.
///
/// Connections additionally expose gender; pending-request views do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantCard {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl From<IdentityProfile> for ParticipantCard {
    fn from(profile: IdentityProfile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            image: profile.image,
            gender: profile.gender,
        }
    }
}

/// A pending connection request enriched with the sender's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestView {
    pub id: Uuid,
    #[serde(rename = "senderId")]
    pub sender: SenderCard,
    pub receiver_id: UserId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PendingRequestView {
    /// Combine a raw request with the fetched sender profile.
    pub fn new(request: ConnectionRequest, sender: IdentityProfile) -> Self {
        Self {
            id: request.id,
            sender: sender.into(),
            receiver_id: request.receiver_id,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// A connection enriched with both participants' profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    pub id: Uuid,
    #[serde(rename = "userId1")]
    pub user_1: ParticipantCard,
    #[serde(rename = "userId2")]
    pub user_2: ParticipantCard,
    pub created_at: DateTime<Utc>,
}
