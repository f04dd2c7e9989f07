//! Auth HTTP handlers.
//!
//! ```text
//! POST /api/auth/refresh
//! ```
//!
//! The route is wrapped by the refresh middleware, which validates the
//! `refreshToken` cookie and sets the rotated `accessToken` cookie on the
//! response. The handler itself only confirms the rotation.

use actix_web::{post, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::middleware::AuthenticatedIdentity;

/// Response payload confirming an access-token rotation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub message: String,
}

/// Rotate the caller's access token from their refresh cookie.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Access token rotated; cookie set", body = RefreshResponse),
        (status = 403, description = "Missing, invalid, or revoked refresh token", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "refreshAccessToken"
)]
#[post("/refresh")]
pub async fn refresh(_identity: AuthenticatedIdentity) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(RefreshResponse {
        message: "Access token refreshed.".to_owned(),
    }))
}
