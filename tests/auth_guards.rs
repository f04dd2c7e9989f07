//! Guard coverage over real wiring: token verification failures on the
//! session side and the full rotation path on the refresh side.

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use serde_json::Value;

use amity::domain::token::{self, TokenSecret};
use amity::domain::{Identity, IdentityProfile, UserId};
use amity::inbound::http::{auth, connections};
use amity::server::settings::Settings;
use amity::server::{wire, AppParts};

fn test_settings() -> Settings {
    Settings {
        access_secret: TokenSecret::new("access-secret"),
        refresh_secret: TokenSecret::new("refresh-secret"),
        access_ttl: Duration::days(30),
        cookie_secure: false,
        bind_addr: "127.0.0.1:0".to_owned(),
    }
}

fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid id")
}

async fn spawn_app(
    parts: AppParts,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .service(
                web::scope("/api/connections")
                    .wrap(parts.session_guard)
                    .app_data(web::Data::new(parts.http_state))
                    .service(connections::list_connections),
            )
            .service(
                web::scope("/api/auth")
                    .wrap(parts.refresh_guard)
                    .service(auth::refresh),
            ),
    )
    .await
}

async fn list_connections_with(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
    >,
    authorization: Option<String>,
) -> ServiceResponse<BoxBody> {
    let mut req = test::TestRequest::get().uri("/api/connections/connections/u1");
    if let Some(value) = authorization {
        req = req.insert_header((header::AUTHORIZATION, value));
    }
    test::call_service(app, req.to_request()).await
}

#[actix_web::test]
async fn missing_access_token_is_unauthorised() {
    let settings = test_settings();
    let app = spawn_app(wire(&settings)).await;

    let res = list_connections_with(&app, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "No token, authorization denied");
}

#[actix_web::test]
async fn expired_access_token_is_rejected() {
    let settings = test_settings();
    let parts = wire(&settings);
    parts
        .identities
        .seed_identity(Identity::new(user("u1")))
        .expect("seed identity");
    let app = spawn_app(parts).await;

    let expired = token::issue(
        &user("u1"),
        &settings.access_secret,
        Duration::seconds(-10),
        Utc::now(),
    );
    let res = list_connections_with(&app, Some(format!("Bearer {expired}"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Token is not valid");
}

#[actix_web::test]
async fn valid_token_for_unknown_identity_is_rejected() {
    let settings = test_settings();
    let app = spawn_app(wire(&settings)).await;

    let stranger = token::issue(
        &user("ghost"),
        &settings.access_secret,
        Duration::hours(1),
        Utc::now(),
    );
    let res = list_connections_with(&app, Some(format!("Bearer {stranger}"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "User not found, authorization denied");
}

#[actix_web::test]
async fn refresh_rotates_the_access_cookie() {
    let settings = test_settings();
    let parts = wire(&settings);
    let refresh_token = token::issue(
        &user("u1"),
        &settings.refresh_secret,
        Duration::days(90),
        Utc::now(),
    );
    parts
        .identities
        .seed_identity(Identity::new(user("u1")).with_refresh_token(refresh_token.clone()))
        .expect("seed identity");
    parts
        .identities
        .seed_profile(IdentityProfile::new(user("u1"), "Ada", "Lovelace"))
        .expect("seed profile");
    let app = spawn_app(parts).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(actix_web::cookie::Cookie::new("refreshToken", refresh_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "accessToken")
        .expect("access cookie set");
    // The rotated token is a valid access token for the same subject.
    let claims = token::verify(cookie.value(), &settings.access_secret, Utc::now())
        .expect("rotated token verifies");
    assert_eq!(claims.subject, user("u1"));

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Access token refreshed.");
}

#[actix_web::test]
async fn missing_refresh_cookie_is_forbidden() {
    let settings = test_settings();
    let app = spawn_app(wire(&settings)).await;

    let req = test::TestRequest::post().uri("/api/auth/refresh").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Refresh token not found");
}

#[actix_web::test]
async fn refresh_token_signed_with_the_wrong_secret_is_forbidden() {
    let settings = test_settings();
    let app = spawn_app(wire(&settings)).await;

    let forged = token::issue(
        &user("u1"),
        &TokenSecret::new("not-the-refresh-secret"),
        Duration::days(1),
        Utc::now(),
    );
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(actix_web::cookie::Cookie::new("refreshToken", forged))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Refresh token is not valid");
}

#[actix_web::test]
async fn rotated_out_refresh_token_is_forbidden() {
    let settings = test_settings();
    let parts = wire(&settings);
    let stale = token::issue(
        &user("u1"),
        &settings.refresh_secret,
        Duration::days(90),
        Utc::now(),
    );
    // The stored slot has moved on; presenting the old token must fail.
    parts
        .identities
        .seed_identity(Identity::new(user("u1")).with_refresh_token("a-newer-token"))
        .expect("seed identity");
    let app = spawn_app(parts).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(actix_web::cookie::Cookie::new("refreshToken", stale))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid refresh token");
}
