use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::helpers::{
    auth_headers, bearer, create_test_app, create_test_state, login_user, register_user,
    setup_test_db, test_request, TEST_SECRET,
};
use crate::{
    config::DEV_PLATFORM,
    create_router,
    services::jwt_service::validate_access_token,
    utils::clock::ManualClock,
};

const EMAIL: &str = "test@example.com";
const PASSWORD: &str = "password123";

#[tokio::test]
async fn test_login_success() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let registered = register_user(&app, EMAIL, PASSWORD).await;
    let response = login_user(&app, EMAIL, PASSWORD).await;

    assert_eq!(response["id"], registered["id"]);
    assert_eq!(response["email"], EMAIL);
    assert_eq!(response["isChirpyRed"], false);
    assert!(response.get("hashedPassword").is_none());

    let token = response["token"].as_str().unwrap();
    let user_id = validate_access_token(token, TEST_SECRET).unwrap();
    assert_eq!(user_id.to_string(), registered["id"].as_str().unwrap());

    let refresh_token = response["refreshToken"].as_str().unwrap();
    assert_eq!(refresh_token.len(), 64);
    assert!(refresh_token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register_user(&app, EMAIL, PASSWORD).await;

    let (wrong_password_status, wrong_password_body, _) = test_request(
        app.clone(),
        "POST",
        "/api/login",
        Some(json!({ "email": EMAIL, "password": "wrongpassword" })),
        None,
    )
    .await;

    let (unknown_email_status, unknown_email_body, _) = test_request(
        app,
        "POST",
        "/api/login",
        Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        None,
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body, unknown_email_body);

    let body: Value = serde_json::from_str(&wrong_password_body).unwrap();
    assert_eq!(body["error"], "Incorrect email or password");
    assert_eq!(body["code"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_each_time_opens_a_new_session() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register_user(&app, EMAIL, PASSWORD).await;

    let first = login_user(&app, EMAIL, PASSWORD).await;
    let second = login_user(&app, EMAIL, PASSWORD).await;
    assert_ne!(first["refreshToken"], second["refreshToken"]);

    // The older session keeps working
    let (status, _, _) = test_request(
        app,
        "POST",
        "/api/refresh",
        None,
        Some(bearer(first["refreshToken"].as_str().unwrap())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_token_success() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let registered = register_user(&app, EMAIL, PASSWORD).await;
    let login = login_user(&app, EMAIL, PASSWORD).await;
    let refresh_token = login["refreshToken"].as_str().unwrap();

    let (status, body, _) = test_request(
        app.clone(),
        "POST",
        "/api/refresh",
        None,
        Some(bearer(refresh_token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    let new_token = response["token"].as_str().unwrap();
    let user_id = validate_access_token(new_token, TEST_SECRET).unwrap();
    assert_eq!(user_id.to_string(), registered["id"].as_str().unwrap());

    // Not rotated: the same refresh token can be used again
    let (status, _, _) = test_request(
        app,
        "POST",
        "/api/refresh",
        None,
        Some(bearer(refresh_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_token_invalid() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let (status, body, _) = test_request(
        app,
        "POST",
        "/api/refresh",
        None,
        Some(bearer("invalid_token")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Invalid refresh token");
}

#[tokio::test]
async fn test_refresh_requires_bearer_header() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let (status, body, _) = test_request(app.clone(), "POST", "/api/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "missing_auth_header");

    let (status, body, _) = test_request(
        app,
        "POST",
        "/api/refresh",
        None,
        Some(auth_headers("Token abc123")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "unsupported_scheme");
}

#[tokio::test]
async fn test_revoke_then_refresh_fails() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register_user(&app, EMAIL, PASSWORD).await;
    let login = login_user(&app, EMAIL, PASSWORD).await;
    let refresh_token = login["refreshToken"].as_str().unwrap();

    let (status, body, _) = test_request(
        app.clone(),
        "POST",
        "/api/revoke",
        None,
        Some(bearer(refresh_token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body, _) = test_request(
        app.clone(),
        "POST",
        "/api/refresh",
        None,
        Some(bearer(refresh_token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "invalid_refresh_token");

    // Revoking again is accepted; the token stays revoked
    let (status, _, _) = test_request(
        app,
        "POST",
        "/api/revoke",
        None,
        Some(bearer(refresh_token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_revoke_unknown_token_is_unauthorized() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let (status, body, _) = test_request(
        app,
        "POST",
        "/api/revoke",
        None,
        Some(bearer("deadbeef")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "invalid_refresh_token");
}

#[tokio::test]
async fn test_refresh_token_expires_after_sixty_days() {
    let pool = setup_test_db().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = create_router(create_test_state(pool, DEV_PLATFORM, clock.clone()));
    register_user(&app, EMAIL, PASSWORD).await;
    let login = login_user(&app, EMAIL, PASSWORD).await;
    let refresh_token = login["refreshToken"].as_str().unwrap();

    clock.advance(Duration::days(59));
    let (status, _, _) = test_request(
        app.clone(),
        "POST",
        "/api/refresh",
        None,
        Some(bearer(refresh_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    clock.advance(Duration::days(1));
    let (status, _, _) = test_request(
        app,
        "POST",
        "/api/refresh",
        None,
        Some(bearer(refresh_token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_lifetime_is_capped() {
    let pool = setup_test_db().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = create_router(create_test_state(pool, DEV_PLATFORM, clock.clone()));
    register_user(&app, EMAIL, PASSWORD).await;

    let (status, body, _) = test_request(
        app,
        "POST",
        "/api/login",
        Some(json!({ "email": EMAIL, "password": PASSWORD, "expiresInSeconds": 86400 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let login: Value = serde_json::from_str(&body).unwrap();
    let token = login["token"].as_str().unwrap();

    let jwt = crate::services::jwt_service::JwtService::with_clock(TEST_SECRET, clock.clone());
    clock.advance(Duration::seconds(3599));
    assert!(jwt.validate(token).is_ok());
    clock.advance(Duration::seconds(1));
    assert!(jwt.validate(token).is_err());
}

#[tokio::test]
async fn test_login_zero_lifetime_uses_default() {
    let pool = setup_test_db().await;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let app = create_router(create_test_state(pool, DEV_PLATFORM, clock.clone()));
    register_user(&app, EMAIL, PASSWORD).await;

    for requested in [0, -30] {
        let (status, body, _) = test_request(
            app.clone(),
            "POST",
            "/api/login",
            Some(json!({ "email": EMAIL, "password": PASSWORD, "expiresInSeconds": requested })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let login: Value = serde_json::from_str(&body).unwrap();
        let token = login["token"].as_str().unwrap();

        assert!(validate_access_token(token, TEST_SECRET).is_ok());

        let jwt = crate::services::jwt_service::JwtService::with_clock(TEST_SECRET, clock.clone());
        clock.advance(Duration::seconds(3599));
        assert!(jwt.validate(token).is_ok());
        clock.advance(Duration::seconds(1));
        assert!(jwt.validate(token).is_err());
    }
}

#[tokio::test]
async fn test_access_token_for_deleted_user_is_rejected() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let token = crate::services::jwt_service::issue_access_token(Uuid::new_v4(), 60, TEST_SECRET)
        .unwrap();

    let (status, _, _) = test_request(
        app,
        "PUT",
        "/api/users",
        Some(json!({ "email": EMAIL, "password": PASSWORD })),
        Some(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
