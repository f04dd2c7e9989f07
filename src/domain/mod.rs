//! Core domain: data model, ports, and the services behind them.
//!
//! Everything in here is transport-agnostic. The HTTP layer drives the
//! services through the driving ports in [`ports`]; persistence is reached
//! through the repository ports, so the services never see a concrete store.

pub mod error;
pub mod identity;
pub mod ports;
pub mod refresh_auth;
pub mod relationship;
pub mod relationship_service;
pub mod session_auth;
pub mod token;
pub mod views;


pub use error::{Error, ErrorCode};
pub use identity::{Identity, IdentityProfile, UserId, UserIdValidationError};
pub use refresh_auth::RefreshAuthService;
pub use relationship::{Connection, ConnectionRequest, PairKey, RequestStatus};
pub use relationship_service::RelationshipService;
pub use session_auth::SessionAuthService;
pub use token::{TokenClaims, TokenError, TokenSecret};
pub use views::{ConnectionView, ParticipantCard, PendingRequestView, SenderCard};
