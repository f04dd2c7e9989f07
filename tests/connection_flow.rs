//! End-to-end lifecycle coverage over real wiring: in-memory stores, real
//! token verification, and the session guard in front of every route.

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use amity::domain::token::{self, TokenSecret};
use amity::domain::{Identity, IdentityProfile, UserId};
use amity::inbound::http::connections;
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

fn seed_user(parts: &AppParts, id: &str, first: &str, last: &str) {
    parts
        .identities
        .seed_identity(Identity::new(user(id)))
        .expect("seed identity");
    parts
        .identities
        .seed_profile(IdentityProfile::new(user(id), first, last).with_image(format!("{id}.png")))
        .expect("seed profile");
}

fn bearer(settings: &Settings, id: &str) -> (header::HeaderName, String) {
    let token = token::issue(&user(id), &settings.access_secret, Duration::hours(1), Utc::now());
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

async fn spawn_app(
    parts: AppParts,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new().service(
            web::scope("/api/connections")
                .wrap(parts.session_guard)
                .app_data(web::Data::new(parts.http_state))
                .service(connections::send_request)
                .service(connections::list_pending)
                .service(connections::respond)
                .service(connections::list_connections)
                .service(connections::delete_connection),
        ),
    )
    .await
}

async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
    >,
    auth: (header::HeaderName, String),
    sender: &str,
    receiver: &str,
) -> ServiceResponse<BoxBody> {
    let req = test::TestRequest::post()
        .uri("/api/connections/send")
        .insert_header(auth)
        .set_json(json!({"senderId": sender, "receiverId": receiver}))
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn full_lifecycle_from_send_to_accept() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    seed_user(&parts, "u2", "Alan", "Turing");
    let app = spawn_app(parts).await;

    let res = send(&app, bearer(&settings, "u1"), "u1", "u2").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Connection request sent.");
    let request_id = body["request"]["id"].as_str().expect("request id").to_owned();

    // The receiver sees the pending request with the populated sender card.
    let req = test::TestRequest::get()
        .uri("/api/connections/pending/u2")
        .insert_header(bearer(&settings, "u2"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let pending: Value = test::read_body_json(res).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(pending[0]["id"], request_id.as_str());
    assert_eq!(pending[0]["senderId"]["firstName"], "Ada");
    assert_eq!(pending[0]["senderId"]["lastName"], "Lovelace");
    assert_eq!(pending[0]["senderId"]["image"], "u1.png");

    let req = test::TestRequest::post()
        .uri(&format!("/api/connections/confirm/{request_id}/response"))
        .insert_header(bearer(&settings, "u2"))
        .set_json(json!({"response": "Accepted"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Request accepted.");
    assert_eq!(body["status"], "Accepted");

    // Both sides observe the connection, with both participants enriched.
    for id in ["u1", "u2"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/connections/connections/{id}"))
            .insert_header(bearer(&settings, id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let connections: Value = test::read_body_json(res).await;
        assert_eq!(connections.as_array().map(Vec::len), Some(1));
        assert_eq!(connections[0]["userId1"]["firstName"], "Ada");
        assert_eq!(connections[0]["userId2"]["firstName"], "Alan");
    }
}

#[actix_web::test]
async fn duplicate_send_conflicts_but_reverse_direction_is_allowed() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    seed_user(&parts, "u2", "Alan", "Turing");
    let app = spawn_app(parts).await;

    let res = send(&app, bearer(&settings, "u1"), "u1", "u2").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send(&app, bearer(&settings, "u1"), "u1", "u2").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body["message"],
        "Request already sent or users are already connected."
    );

    // Only the exact ordering counts as a duplicate.
    let res = send(&app, bearer(&settings, "u2"), "u2", "u1").await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn connected_pair_rejects_new_requests_in_either_direction() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    seed_user(&parts, "u2", "Alan", "Turing");
    let app = spawn_app(parts).await;

    let res = send(&app, bearer(&settings, "u1"), "u1", "u2").await;
    let body: Value = test::read_body_json(res).await;
    let request_id = body["request"]["id"].as_str().expect("request id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!("/api/connections/confirm/{request_id}/response"))
        .insert_header(bearer(&settings, "u2"))
        .set_json(json!({"response": "Accepted"}))
        .to_request();
    test::call_service(&app, req).await;

    for (sender, receiver) in [("u1", "u2"), ("u2", "u1")] {
        let res = send(&app, bearer(&settings, sender), sender, receiver).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn reject_removes_the_request_and_a_second_respond_conflicts() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    seed_user(&parts, "u3", "Grace", "Hopper");
    let app = spawn_app(parts).await;

    let res = send(&app, bearer(&settings, "u1"), "u1", "u3").await;
    let body: Value = test::read_body_json(res).await;
    let request_id = body["request"]["id"].as_str().expect("request id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!("/api/connections/confirm/{request_id}/response"))
        .insert_header(bearer(&settings, "u3"))
        .set_json(json!({"response": "Rejected"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Request rejected.");

    let req = test::TestRequest::get()
        .uri("/api/connections/pending/u3")
        .insert_header(bearer(&settings, "u3"))
        .to_request();
    let res = test::call_service(&app, req).await;
    let pending: Value = test::read_body_json(res).await;
    assert_eq!(pending, json!([]));

    // The record is gone, so a second respond loses.
    let req = test::TestRequest::post()
        .uri(&format!("/api/connections/confirm/{request_id}/response"))
        .insert_header(bearer(&settings, "u3"))
        .set_json(json!({"response": "Accepted"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid or expired request.");
}

#[actix_web::test]
async fn delete_connection_cascades_and_scopes_the_refreshed_list() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    seed_user(&parts, "u2", "Alan", "Turing");
    seed_user(&parts, "u3", "Grace", "Hopper");
    let app = spawn_app(parts).await;

    // Connect u1 and u2.
    let res = send(&app, bearer(&settings, "u1"), "u1", "u2").await;
    let body: Value = test::read_body_json(res).await;
    let request_id = body["request"]["id"].as_str().expect("request id").to_owned();
    let req = test::TestRequest::post()
        .uri(&format!("/api/connections/confirm/{request_id}/response"))
        .insert_header(bearer(&settings, "u2"))
        .set_json(json!({"response": "Accepted"}))
        .to_request();
    test::call_service(&app, req).await;

    // An unrelated pending request to u2 must survive the upcoming cascade.
    let res = send(&app, bearer(&settings, "u3"), "u3", "u2").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/connections/connections/u1")
        .insert_header(bearer(&settings, "u1"))
        .to_request();
    let res = test::call_service(&app, req).await;
    let connections: Value = test::read_body_json(res).await;
    let connection_id = connections[0]["id"].as_str().expect("connection id").to_owned();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/connections/deleteConnection/{connection_id}"))
        .insert_header(bearer(&settings, "u1"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Connection deleted successfully.");
    // The refreshed list covers the deleted connection's first side only.
    assert_eq!(body["connections"], json!([]));

    // The accepted request between the pair was cascade-deleted, so sending
    // again succeeds; the unrelated request to u2 is untouched.
    let res = send(&app, bearer(&settings, "u2"), "u2", "u1").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let req = test::TestRequest::get()
        .uri("/api/connections/pending/u2")
        .insert_header(bearer(&settings, "u2"))
        .to_request();
    let res = test::call_service(&app, req).await;
    let pending: Value = test::read_body_json(res).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(pending[0]["senderId"]["firstName"], "Grace");
}

#[actix_web::test]
async fn delete_unknown_connection_is_not_found() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    let app = spawn_app(parts).await;

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/connections/deleteConnection/{}",
            uuid::Uuid::new_v4()
        ))
        .insert_header(bearer(&settings, "u1"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Connection not found.");
}

#[actix_web::test]
async fn invalid_decision_value_is_rejected() {
    let settings = test_settings();
    let parts = wire(&settings);
    seed_user(&parts, "u1", "Ada", "Lovelace");
    seed_user(&parts, "u2", "Alan", "Turing");
    let app = spawn_app(parts).await;

    let res = send(&app, bearer(&settings, "u1"), "u1", "u2").await;
    let body: Value = test::read_body_json(res).await;
    let request_id = body["request"]["id"].as_str().expect("request id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!("/api/connections/confirm/{request_id}/response"))
        .insert_header(bearer(&settings, "u2"))
        .set_json(json!({"response": "maybe"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Invalid response value.");
}
