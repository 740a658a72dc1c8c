use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use activation_auth::{
    routes::{API_PREFIX, router},
    test_helpers::{RecordingMailNotifier, test_config, test_router, test_state},
};

fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should complete");
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be json")
    };
    (status, cookie, body)
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(api_path(path))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn with_cookie(method: &str, path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(api_path(path))
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build")
}

fn get_users(access_token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(api_path("/users"));
    if let Some(token) = access_token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

/// `refreshToken=<value>` part of a Set-Cookie header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .expect("cookie should have a pair")
        .to_string()
}

#[tokio::test]
async fn full_flow_over_http() {
    let mailer = RecordingMailNotifier::default();
    let app = test_router(Arc::new(mailer.clone())).await;

    let (status, set_cookie, body) = send(
        &app,
        post_json("/registration", json!({"email": "a@b.co", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "a@b.co");
    assert_eq!(body["data"]["user"]["is_activated"], false);
    assert!(body["data"]["access_token"].as_str().is_some());
    let set_cookie = set_cookie.expect("registration should set cookie");
    assert!(set_cookie.contains("HttpOnly"));

    let link = mailer
        .last_link_for("a@b.co")
        .expect("activation mail should be sent");
    let (status, _, body) = send(
        &app,
        Request::builder()
            .uri(api_path(&format!("/activate/{link}")))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["activated"], true);

    let (status, set_cookie, body) = send(
        &app,
        post_json("/login", json!({"email": "a@b.co", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["is_activated"], true);
    let access_token = body["data"]["access_token"]
        .as_str()
        .expect("access token should be present")
        .to_string();
    let login_cookie = cookie_pair(&set_cookie.expect("login should set cookie"));

    let (status, _, body) = send(&app, get_users(Some(&access_token))).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().expect("users should be a list");
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password_hash").is_none());
    assert!(users[0].get("activation_link").is_none());

    let (status, set_cookie, body) = send(&app, with_cookie("GET", "/refresh", &login_cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["refresh_token"].as_str().is_some());
    let refreshed_cookie = cookie_pair(&set_cookie.expect("refresh should set cookie"));
    assert_ne!(refreshed_cookie, login_cookie);

    let (status, _, _) = send(&app, with_cookie("GET", "/refresh", &login_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, set_cookie, body) =
        send(&app, with_cookie("POST", "/logout", &refreshed_cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user_id"].as_str().is_some());
    assert!(body["data"].get("id").is_none());
    assert!(
        set_cookie
            .expect("logout should clear cookie")
            .contains("Max-Age=0")
    );

    let (status, _, body) = send(&app, with_cookie("GET", "/refresh", &refreshed_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User is not authorized");
}

#[tokio::test]
async fn duplicate_registration_is_bad_request() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;
    let payload = json!({"email": "a@b.co", "password": "pw"});

    let (status, _, _) = send(&app, post_json("/registration", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, post_json("/registration", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with email a@b.co already exists");
}

#[tokio::test]
async fn login_errors_do_not_reveal_which_part_failed() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;
    send(
        &app,
        post_json("/registration", json!({"email": "a@b.co", "password": "pw"})),
    )
    .await;

    let (unknown_status, _, unknown) = send(
        &app,
        post_json("/login", json!({"email": "x@b.co", "password": "pw"})),
    )
    .await;
    let (wrong_status, _, wrong) = send(
        &app,
        post_json("/login", json!({"email": "a@b.co", "password": "nope"})),
    )
    .await;
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn users_require_bearer_token() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;

    let (status, _, body) = send(&app, get_users(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User is not authorized");

    let (status, _, _) = send(&app, get_users(Some("forged.token.value"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;
    let (_, _, body) = send(
        &app,
        post_json("/registration", json!({"email": "a@b.co", "password": "pw"})),
    )
    .await;
    let refresh_token = body["data"]["refresh_token"]
        .as_str()
        .expect("refresh token should be present");

    let (status, _, _) = send(&app, get_users(Some(refresh_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;

    let (status, _, body) = send(
        &app,
        Request::builder()
            .uri(api_path("/refresh"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn logout_without_record_returns_null() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;

    let (status, _, body) = send(&app, with_cookie("POST", "/logout", "refreshToken=unknown")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn activation_redirects_to_client_when_configured() {
    let mailer = RecordingMailNotifier::default();
    let mut cfg = test_config();
    cfg.general.client_url = Some("http://client.test".to_string());
    let app = router(test_state(cfg, Arc::new(mailer.clone())).await);

    send(
        &app,
        post_json("/registration", json!({"email": "a@b.co", "password": "pw"})),
    )
    .await;
    let link = mailer
        .last_link_for("a@b.co")
        .expect("activation mail should be sent");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(api_path(&format!("/activate/{link}")))
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("http://client.test")
    );
}

#[tokio::test]
async fn unknown_activation_link_is_bad_request() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;

    let (status, _, body) = send(
        &app,
        Request::builder()
            .uri(api_path("/activate/not-a-link"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid activation link");
}

#[tokio::test]
async fn unknown_routes_and_bad_bodies_use_envelope() {
    let app = test_router(Arc::new(RecordingMailNotifier::default())).await;

    let (status, _, body) = send(
        &app,
        Request::builder()
            .uri(api_path("/nope"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(api_path("/login"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request should build"),
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(body["status"], status.as_u16());
}
