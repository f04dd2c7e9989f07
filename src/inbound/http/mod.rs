//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod connections;
pub mod health;
pub mod state;

use crate::domain::Error;

/// Result alias for HTTP handlers returning the shared error payload.
pub type ApiResult<T> = Result<T, Error>;
