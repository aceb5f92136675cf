mod common;

use std::sync::atomic::Ordering;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn account_round_trip_and_soft_delete() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;

    let (status, created) = app
        .post(
            "/v1/account",
            &token,
            json!({ "name": "Wallet", "type": "cash", "description": "pocket money" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");
    let id = created["id"].as_i64().expect("id");

    let (status, fetched) = app.get(&format!("/v1/account/{id}"), &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Wallet");
    assert_eq!(fetched["type"], "cash");
    assert_eq!(fetched["description"], "pocket money");

    let (status, body) = app.delete(&format!("/v1/account/{id}"), &token).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/v1/account/{id}"), &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = app.get("/v1/account?limit=10&offset=0", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 0);
    assert_eq!(list["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn patch_merges_supplied_fields() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;
    let id = app.create_account(&token, "Savings", "bank").await?;

    let (status, updated) = app
        .patch(
            &format!("/v1/account/{id}"),
            &token,
            json!({ "description": "rainy day fund" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Savings");
    assert_eq!(updated["type"], "bank");
    assert_eq!(updated["description"], "rainy day fund");
    Ok(())
}

#[tokio::test]
async fn missing_account_is_not_found_without_mutation() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;
    let before = app.accounts.mutations.load(Ordering::SeqCst);

    let (status, body) = app
        .patch("/v1/account/999", &token, json!({ "name": "Ghost" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app.delete("/v1/account/999", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.accounts.mutations.load(Ordering::SeqCst), before);
    Ok(())
}

#[tokio::test]
async fn deleted_account_cannot_be_updated_or_deleted_again() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;
    let id = app.create_account(&token, "Old card", "credit").await?;

    let (status, _) = app.delete(&format!("/v1/account/{id}"), &token).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let before = app.accounts.mutations.load(Ordering::SeqCst);

    let (status, _) = app
        .patch(&format!("/v1/account/{id}"), &token, json!({ "name": "Revived" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&format!("/v1/account/{id}"), &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.accounts.mutations.load(Ordering::SeqCst), before);
    Ok(())
}

#[tokio::test]
async fn non_integer_id_is_not_found() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;

    let (status, _) = app.get("/v1/account/abc", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_requires_every_field() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;

    let (status, body) = app
        .post("/v1/account", &token, json!({ "name": "Wallet", "type": "cash" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["description"].is_string());
    assert_eq!(app.accounts.mutations.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn unparseable_body_is_unprocessable() -> Result<()> {
    let app = common::TestApp::new();
    let token = app.login("owner@example.com").await?;

    let (status, body) = app
        .post("/v1/account", &token, json!({ "name": 42, "type": "cash", "description": "x" }))
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}
