//! Token obtain and refresh endpoints.

use super::helpers::{PASSWORD, TestApp, USERNAME, app, post_json, request};
use axum::http::{Method, StatusCode, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn valid_credentials_return_both_tokens(app: TestApp) -> eyre::Result<()> {
    let response = app
        .send(post_json(
            "/api/token/",
            &json!({"username": USERNAME, "password": PASSWORD}),
            None,
        ))
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["access"].is_string());
    assert!(response.body["refresh"].is_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn obtained_access_token_authorizes_task_creation(app: TestApp) -> eyre::Result<()> {
    let token = app.access_token().await?;
    let body = json!({
        "title": "Title",
        "description": "This is a ValidDescription",
        "status": "TODO",
    });

    let response = app.send(post_json("/tasks/", &body, Some(&token))).await?;

    assert_eq!(response.status, StatusCode::CREATED);
    Ok(())
}

#[rstest]
#[case(json!({"username": USERNAME, "password": "wrong"}))]
#[case(json!({"username": "nobody", "password": PASSWORD}))]
#[tokio::test(flavor = "multi_thread")]
async fn bad_credentials_are_refused(app: TestApp, #[case] body: Value) -> eyre::Result<()> {
    let response = app.send(post_json("/api/token/", &body, None)).await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({ "detail": "No active account found with the given credentials" })
    );
    assert!(response.headers.contains_key(header::WWW_AUTHENTICATE));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_credentials_fields_are_reported(app: TestApp) -> eyre::Result<()> {
    let response = app
        .send(request(Method::POST, "/api/token/", Vec::new(), None))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "username": ["This field is required."],
            "password": ["This field is required."],
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_username_is_reported(app: TestApp) -> eyre::Result<()> {
    let response = app
        .send(post_json(
            "/api/token/",
            &json!({"username": "  ", "password": PASSWORD}),
            None,
        ))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "username": ["This field may not be blank."] })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_returns_only_a_new_access_token(app: TestApp) -> eyre::Result<()> {
    let (_, refresh) = app.login().await?;

    let response = app
        .send(post_json("/api/token/refresh/", &json!({"refresh": refresh}), None))
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["access"].is_string());
    assert!(response.body.get("refresh").is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_refresh_token_is_refused(app: TestApp) -> eyre::Result<()> {
    let (_, refresh) = app.login().await?;
    app.clock.advance(24 * 60 * 60 + 1);

    let response = app
        .send(post_json("/api/token/refresh/", &json!({"refresh": refresh}), None))
        .await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({ "detail": "Token is invalid or expired", "code": "token_not_valid" })
    );
    assert!(response.body.get("access").is_none());
    Ok(())
}

#[rstest]
#[case("not-a-token")]
#[case("eyJhbGciOiJIUzI1NiJ9.e30.invalid")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_refresh_token_is_refused(app: TestApp, #[case] token: &str) -> eyre::Result<()> {
    let response = app
        .send(post_json("/api/token/refresh/", &json!({"refresh": token}), None))
        .await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "token_not_valid");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn access_token_cannot_be_used_to_refresh(app: TestApp) -> eyre::Result<()> {
    let token = app.access_token().await?;

    let response = app
        .send(post_json("/api/token/refresh/", &json!({"refresh": token}), None))
        .await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["detail"], "Token is invalid or expired");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_refresh_field_is_reported(app: TestApp) -> eyre::Result<()> {
    let response = app
        .send(post_json("/api/token/refresh/", &json!({}), None))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "refresh": ["This field is required."] })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn access_token_claims_hold_no_personal_data(app: TestApp) -> eyre::Result<()> {
    let token = app.access_token().await?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let claims = decode::<Value>(&token, &DecodingKey::from_secret(b""), &validation)?.claims;

    assert_eq!(claims["token_type"], "access");
    assert_eq!(claims["user_id"], 1);
    for private in ["username", "email", "password"] {
        assert!(claims.get(private).is_none(), "claims leak {private}");
    }
    Ok(())
}
