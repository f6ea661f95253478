//! `POST /tasks/` behaviour for authenticated callers.

use super::helpers::{TestApp, app, post_json, request};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

fn valid_task(title: &str) -> Value {
    json!({
        "title": title,
        "description": "This is a ValidDescription",
        "status": "TODO",
    })
}

async fn submit(app: &TestApp, body: &Value) -> eyre::Result<(StatusCode, Value)> {
    let token = app.access_token().await?;
    let response = app.send(post_json("/tasks/", body, Some(&token))).await?;
    Ok((response.status, response.body))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn valid_task_is_created(app: TestApp) -> eyre::Result<()> {
    let (status, body) = submit(&app, &valid_task("Title")).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "title": "Title",
            "description": "This is a ValidDescription",
            "status": "TODO",
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identifiers_increase_across_requests(app: TestApp) -> eyre::Result<()> {
    let (_, first) = submit(&app, &valid_task("First")).await?;
    let (_, second) = submit(&app, &valid_task("Second")).await?;

    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);
    Ok(())
}

#[rstest]
#[case(json!({"description": "This is a ValidDescription", "status": "TODO"}), "Missing required fields")]
#[case(json!({"title": "$Title", "description": "This is a ValidDescription", "status": "TODO"}), "Special titles are not allowed")]
#[case(json!({"title": "Title", "description": "Too short", "status": "TODO"}), "Description must be at least 20 characters")]
#[case(json!({"title": "Title", "description": "This is a ValidDescription", "status": "BLOCKED"}), "Invalid status value")]
#[tokio::test(flavor = "multi_thread")]
async fn rule_failures_return_the_error_message(
    app: TestApp,
    #[case] body: Value,
    #[case] message: &str,
) -> eyre::Result<()> {
    let (status, response) = submit(&app, &body).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({ "error": message }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_task_with_the_same_title_is_rejected(app: TestApp) -> eyre::Result<()> {
    let (first, _) = submit(&app, &valid_task("TestTitle")).await?;
    let (second, body) = submit(&app, &valid_task("testTITLE")).await?;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "A task with a similar title already exists" })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schema_failures_return_field_errors(app: TestApp) -> eyre::Result<()> {
    let body = json!({
        "title": ["not", "a", "string"],
        "description": "",
        "status": "TODO",
    });

    let (status, response) = submit(&app, &body).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({
            "title": ["Not a valid string."],
            "description": ["This field may not be blank."],
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlong_title_is_a_field_error(app: TestApp) -> eyre::Result<()> {
    let (status, response) = submit(&app, &valid_task(&"T".repeat(201))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({ "title": ["Ensure this field has no more than 200 characters."] })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_body_is_missing_every_field(app: TestApp) -> eyre::Result<()> {
    let token = app.access_token().await?;

    let response = app
        .send(request(Method::POST, "/tasks/", Vec::new(), Some(&token)))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "Missing required fields" }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_a_parse_error(app: TestApp) -> eyre::Result<()> {
    let token = app.access_token().await?;

    let response = app
        .send(request(
            Method::POST,
            "/tasks/",
            b"{\"title\": ".to_vec(),
            Some(&token),
        ))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let detail = response.body["detail"].as_str().unwrap_or_default();
    assert!(detail.starts_with("JSON parse error - "), "detail was {detail}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_object_body_is_rejected(app: TestApp) -> eyre::Result<()> {
    let (status, response) = submit(&app, &json!(["Title"])).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({ "non_field_errors": ["Invalid data. Expected a dictionary, but got list."] })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_task_is_not_stored(app: TestApp) -> eyre::Result<()> {
    let invalid = json!({
        "title": "Reusable",
        "description": "This is a ValidDescription",
        "status": "BLOCKED",
    });
    let (rejected, _) = submit(&app, &invalid).await?;
    let (accepted, body) = submit(&app, &valid_task("Reusable")).await?;

    assert_eq!(rejected, StatusCode::BAD_REQUEST);
    assert_eq!(accepted, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    Ok(())
}
