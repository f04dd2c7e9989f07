//! Connection request and connection aggregates.
//!
//! A [`ConnectionRequest`] is directed: the (sender, receiver) ordering is
//! part of its identity and duplicate detection. A [`Connection`] is
//! undirected; [`PairKey`] provides the canonical unordered pair used for
//! uniqueness checks and cascade deletion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Lifecycle state of a [`ConnectionRequest`].
///
/// Requests are created `Pending`. Acceptance retains the record as
/// `Accepted` alongside the created connection; rejection deletes the record
/// outright, so `Rejected` never persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Accepted => f.write_str("Accepted"),
            Self::Rejected => f.write_str("Rejected"),
        }
    }
}

/// A proposed relationship from one identity to another.
///
/// ## Invariants
/// - At most one `Pending` request exists per ordered (sender, receiver)
///   pair; the store enforces this at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConnectionRequest {
    /// Create a fresh `Pending` request.
    pub fn pending(sender_id: UserId, receiver_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The unordered pair this request is about.
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.sender_id.clone(), self.receiver_id.clone())
    }
}

/// A confirmed, undirected relationship between two identities.
///
/// ## Invariants
/// - At most one connection exists per unordered pair; the store enforces
///   this at insert time.
/// - `user_id_1` is the sender of the accepted request that created the
///   connection; `delete_connection` scopes its refreshed list to this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: Uuid,
    pub user_id_1: UserId,
    pub user_id_2: UserId,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    /// Create a connection between two identities.
    pub fn new(user_id_1: UserId, user_id_2: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id_1,
            user_id_2,
            created_at: now,
        }
    }

    /// The unordered pair this connection joins.
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.user_id_1.clone(), self.user_id_2.clone())
    }

    /// Whether the given user sits on either side of the connection.
    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.user_id_1 == user_id || &self.user_id_2 == user_id
    }
}

/// Canonical unordered pair of identities.
///
/// Construction sorts the two ids, so `{a, b}` and `{b, a}` compare equal.
///
/// # Examples
/// ```
/// use amity::domain::{PairKey, UserId};
///
/// let a = UserId::new("u1").expect("valid id");
/// let b = UserId::new("u2").expect("valid id");
/// assert_eq!(PairKey::new(a.clone(), b.clone()), PairKey::new(b, a));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(UserId, UserId);

impl PairKey {
    /// Build the canonical pair for two identities.
    pub fn new(a: UserId, b: UserId) -> Self {
        if a.as_ref() <= b.as_ref() {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Whether the given request is between this pair, in either direction.
    pub fn matches_request(&self, request: &ConnectionRequest) -> bool {
        self == &request.pair()
    }
}
