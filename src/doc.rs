//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: the connection lifecycle endpoints, the refresh endpoint,
//! the health probes, and the shared error payload. The generated document
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{DeleteConnectionOutcome, RespondOutcome};
use crate::domain::{
    ConnectionRequest, ConnectionView, Error, ErrorCode, ParticipantCard, PendingRequestView,
    RequestStatus, SenderCard,
};
use crate::inbound::http::auth::RefreshResponse;
use crate::inbound::http::connections::{RespondBody, SendRequestBody, SendRequestResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Amity connection API",
        description = "HTTP interface for token-authenticated social connections."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::connections::send_request,
        crate::inbound::http::connections::list_pending,
        crate::inbound::http::connections::respond,
        crate::inbound::http::connections::list_connections,
        crate::inbound::http::connections::delete_connection,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RequestStatus,
        ConnectionRequest,
        PendingRequestView,
        ConnectionView,
        SenderCard,
        ParticipantCard,
        SendRequestBody,
        SendRequestResponse,
        RespondBody,
        RespondOutcome,
        DeleteConnectionOutcome,
        RefreshResponse,
    )),
    tags(
        (name = "connections", description = "Connection request lifecycle"),
        (name = "auth", description = "Token refresh"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
