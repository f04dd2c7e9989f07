//! Connection lifecycle HTTP handlers.
//!
//! ```text
//! POST   /api/connections/send
//! GET    /api/connections/pending/{userId}
//! POST   /api/connections/confirm/{requestId}/response
//! GET    /api/connections/connections/{userId}
//! DELETE /api/connections/deleteConnection/{connectionId}
//! ```
//!
//! The scope is wrapped by the session middleware; handlers assume the
//! caller is authenticated and act on the ids carried by the request.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{DeleteConnectionOutcome, RespondOutcome};
use crate::domain::{ConnectionRequest, ConnectionView, Error, PendingRequestView, UserId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Parse a raw user id into the validation error clients expect.
fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::invalid_request("User ID is required"))
}

/// Request payload for sending a connection request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    pub sender_id: String,
    pub receiver_id: String,
}

/// Response payload confirming a sent request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestResponse {
    pub message: String,
    pub request: ConnectionRequest,
}

/// Request payload carrying the decision applied to a pending request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RespondBody {
    /// `Accepted` or `Rejected`.
    pub response: String,
}

/// Send a connection request from one user to another.
#[utoipa::path(
    post,
    path = "/api/connections/send",
    request_body = SendRequestBody,
    responses(
        (status = 201, description = "Request created", body = SendRequestResponse),
        (status = 400, description = "Invalid ids, duplicate request, or existing connection", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "sendConnectionRequest"
)]
#[post("/send")]
pub async fn send_request(
    state: web::Data<HttpState>,
    payload: web::Json<SendRequestBody>,
) -> ApiResult<HttpResponse> {
    let sender_id = parse_user_id(&payload.sender_id)?;
    let receiver_id = parse_user_id(&payload.receiver_id)?;
    let request = state
        .relationships
        .send_request(&sender_id, &receiver_id)
        .await?;
    Ok(HttpResponse::Created().json(SendRequestResponse {
        message: "Connection request sent.".to_owned(),
        request,
    }))
}

/// List pending requests addressed to a user, enriched with sender cards.
#[utoipa::path(
    get,
    path = "/api/connections/pending/{userId}",
    params(("userId" = String, Path, description = "Receiver's user id")),
    responses(
        (status = 200, description = "Pending requests in insertion order", body = [PendingRequestView]),
        (status = 400, description = "Invalid user id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "listPendingRequests"
)]
#[get("/pending/{userId}")]
pub async fn list_pending(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PendingRequestView>>> {
    let user_id = parse_user_id(&path.into_inner())?;
    let pending = state.relationships.list_pending(&user_id).await?;
    Ok(web::Json(pending))
}

/// Accept or reject a pending connection request.
#[utoipa::path(
    post,
    path = "/api/connections/confirm/{requestId}/response",
    params(("requestId" = Uuid, Path, description = "Pending request id")),
    request_body = RespondBody,
    responses(
        (status = 200, description = "Decision applied", body = RespondOutcome),
        (status = 400, description = "Invalid decision or non-pending request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "respondToRequest"
)]
#[post("/confirm/{requestId}/response")]
pub async fn respond(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<RespondBody>,
) -> ApiResult<web::Json<RespondOutcome>> {
    let request_id = path.into_inner();
    let outcome = state
        .relationships
        .respond(&request_id, &payload.response)
        .await?;
    Ok(web::Json(outcome))
}

/// List a user's connections, both participants enriched.
#[utoipa::path(
    get,
    path = "/api/connections/connections/{userId}",
    params(("userId" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Connections in insertion order", body = [ConnectionView]),
        (status = 400, description = "Invalid user id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "listConnections"
)]
#[get("/connections/{userId}")]
pub async fn list_connections(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ConnectionView>>> {
    let user_id = parse_user_id(&path.into_inner())?;
    let connections = state.relationships.list_connections(&user_id).await?;
    Ok(web::Json(connections))
}

/// Delete a connection and cascade-delete requests between the pair.
#[utoipa::path(
    delete,
    path = "/api/connections/deleteConnection/{connectionId}",
    params(("connectionId" = Uuid, Path, description = "Connection id")),
    responses(
        (status = 200, description = "Connection deleted", body = DeleteConnectionOutcome),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Connection not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["connections"],
    operation_id = "deleteConnection"
)]
#[delete("/deleteConnection/{connectionId}")]
pub async fn delete_connection(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeleteConnectionOutcome>> {
    let connection_id = path.into_inner();
    let outcome = state.relationships.delete_connection(&connection_id).await?;
    Ok(web::Json(outcome))
}
