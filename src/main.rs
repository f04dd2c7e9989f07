//! Service entry-point: wires settings, guards, REST endpoints, and docs.

use actix_web::{web, App, HttpServer};
use mockable::DefaultEnv;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use amity::doc::ApiDoc;
use amity::inbound::http::health::{live, ready, HealthState};
use amity::inbound::http::{auth, connections};
use amity::server::settings::{settings_from_env, BuildMode};
use amity::server::{wire, AppParts};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = settings_from_env(&DefaultEnv::default(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let parts = wire(&settings);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), parts.clone())
    })
    .bind(settings.bind_addr.as_str())?;

    health_state.mark_ready();
    server.run().await
}

fn build_app(
    health_state: web::Data<HealthState>,
    parts: AppParts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let connections_scope = web::scope("/api/connections")
        .wrap(parts.session_guard)
        .service(connections::send_request)
        .service(connections::list_pending)
        .service(connections::respond)
        .service(connections::list_connections)
        .service(connections::delete_connection);

    let auth_scope = web::scope("/api/auth")
        .wrap(parts.refresh_guard)
        .service(auth::refresh);

    #[cfg_attr(not(debug_assertions), allow(unused_mut))]
    let mut app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(parts.http_state))
        .service(connections_scope)
        .service(auth_scope)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}
